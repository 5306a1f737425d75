//! Bundled catalog used when the server omits display metadata, plus the
//! dial codes offered during phone enrollment.

use super::types::{Auth2FAProvider, Auth2FAProviderType, ProviderKind};
use std::fmt;

#[must_use]
pub fn provider_types() -> Vec<Auth2FAProviderType> {
    vec![
        Auth2FAProviderType {
            kind: ProviderKind::Authenticator,
            title: "Authenticator app".to_string(),
            subtitle: Some("Use a code generated by an app on your phone".to_string()),
        },
        Auth2FAProviderType {
            kind: ProviderKind::Phone,
            title: "Phone number".to_string(),
            subtitle: Some("Receive a code by text message".to_string()),
        },
    ]
}

#[must_use]
pub fn authenticator_apps() -> Vec<Auth2FAProvider> {
    let app = |key: &str, name: &str, ios: &str, android: &str| Auth2FAProvider {
        key: key.to_string(),
        name: name.to_string(),
        kind: ProviderKind::Authenticator,
        url_ios: Some(ios.to_string()),
        url_android: Some(android.to_string()),
    };

    vec![
        app(
            "google",
            "Google Authenticator",
            "https://apps.apple.com/app/google-authenticator/id388497605",
            "https://play.google.com/store/apps/details?id=com.google.android.apps.authenticator2",
        ),
        app(
            "microsoft",
            "Microsoft Authenticator",
            "https://apps.apple.com/app/microsoft-authenticator/id983156458",
            "https://play.google.com/store/apps/details?id=com.azure.authenticator",
        ),
        app(
            "authy",
            "Twilio Authy",
            "https://apps.apple.com/app/twilio-authy/id494168017",
            "https://play.google.com/store/apps/details?id=com.authy.authy",
        ),
    ]
}

/// Server metadata when present, the bundled catalog otherwise.
#[must_use]
pub fn provider_types_or_default(types: &[Auth2FAProviderType]) -> Vec<Auth2FAProviderType> {
    if types.is_empty() {
        provider_types()
    } else {
        types.to_vec()
    }
}

#[must_use]
pub fn authenticator_apps_or_default(apps: &[Auth2FAProvider]) -> Vec<Auth2FAProvider> {
    if apps.is_empty() {
        authenticator_apps()
    } else {
        apps.to_vec()
    }
}

/// A country calling code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialCode {
    pub country: &'static str,
    pub iso: &'static str,
    pub code: &'static str,
}

impl fmt::Display for DialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.country, self.code)
    }
}

const DIAL_CODES: &[(&str, &str, &str)] = &[
    ("Netherlands", "NL", "+31"),
    ("Belgium", "BE", "+32"),
    ("Germany", "DE", "+49"),
    ("France", "FR", "+33"),
    ("Luxembourg", "LU", "+352"),
    ("United Kingdom", "GB", "+44"),
    ("Ireland", "IE", "+353"),
    ("Spain", "ES", "+34"),
    ("Portugal", "PT", "+351"),
    ("Italy", "IT", "+39"),
    ("Austria", "AT", "+43"),
    ("Switzerland", "CH", "+41"),
    ("Denmark", "DK", "+45"),
    ("Sweden", "SE", "+46"),
    ("Norway", "NO", "+47"),
    ("Finland", "FI", "+358"),
    ("Poland", "PL", "+48"),
    ("Czech Republic", "CZ", "+420"),
    ("Greece", "GR", "+30"),
    ("Turkey", "TR", "+90"),
    ("Morocco", "MA", "+212"),
    ("Suriname", "SR", "+597"),
    ("Curaçao", "CW", "+599"),
    ("United States", "US", "+1"),
];

#[must_use]
pub fn dial_codes() -> Vec<DialCode> {
    DIAL_CODES
        .iter()
        .map(|&(country, iso, code)| DialCode { country, iso, code })
        .collect()
}

/// Dial code used when none was chosen.
#[must_use]
pub fn default_dial_code() -> DialCode {
    DialCode {
        country: "Netherlands",
        iso: "NL",
        code: "+31",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_kind() {
        let types = provider_types();
        for kind in ProviderKind::ALL {
            assert!(types.iter().any(|t| t.kind == kind), "missing {kind}");
        }
        assert!(authenticator_apps()
            .iter()
            .all(|app| app.kind == ProviderKind::Authenticator && app.url_ios.is_some()));
    }

    #[test]
    fn server_metadata_wins() {
        let server = vec![Auth2FAProviderType {
            kind: ProviderKind::Phone,
            title: "SMS".to_string(),
            subtitle: None,
        }];
        assert_eq!(provider_types_or_default(&server), server);
        assert_eq!(provider_types_or_default(&[]).len(), 2);
    }

    #[test]
    fn dial_codes_are_unique() {
        let codes = dial_codes();
        let mut isos: Vec<_> = codes.iter().map(|c| c.iso).collect();
        isos.sort_unstable();
        isos.dedup();
        assert_eq!(isos.len(), codes.len());
        assert!(codes.contains(&default_dial_code()));
    }
}

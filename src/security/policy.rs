//! HSTS policy resolution.
//!
//! # Responsibilities
//! - Validate user-supplied `HstsSettings`
//! - Build the directive suffix (`; includeSubDomains`, `; preload`)
//! - Render `max-age=<n><suffix>` header values
//!
//! # Design Decisions
//! - The resolved policy is a plain immutable value; the middleware captures
//!   a copy when it wraps a service instead of reading shared state
//! - The suffix is rebuilt from scratch on every (re)configuration
//! - Validation happens before anything is derived, so a rejected
//!   reconfiguration leaves the existing policy untouched

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::HstsSettings;

/// Errors raised while resolving an HSTS policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HstsError {
    #[error("HSTS max-age can't be less than zero (got {0})")]
    InvalidMaxAge(i64),
}

/// Optional directives, in the order they appear in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    IncludeSubDomains,
    Preload,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::IncludeSubDomains => "includeSubDomains",
            Directive::Preload => "preload",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, derived HSTS state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstsPolicy {
    pub(crate) max_age: i64,
    pub(crate) expires: Option<DateTime<Utc>>,
    pub(crate) directive_suffix: String,
}

impl HstsPolicy {
    /// Validate `settings` and derive a policy from them.
    pub fn configure(settings: &HstsSettings) -> Result<Self, HstsError> {
        if settings.max_age < 0 {
            return Err(HstsError::InvalidMaxAge(settings.max_age));
        }

        let policy = Self {
            max_age: settings.max_age,
            expires: settings.expires,
            directive_suffix: build_suffix(settings),
        };

        tracing::info!(
            max_age = policy.max_age,
            expires = ?policy.expires,
            directives = %policy.directive_suffix,
            "HSTS policy configured"
        );
        Ok(policy)
    }

    /// Replace this policy with one derived from `settings`.
    ///
    /// On error `self` is left exactly as it was.
    pub fn reconfigure(&mut self, settings: &HstsSettings) -> Result<(), HstsError> {
        *self = Self::configure(settings)?;
        Ok(())
    }

    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// `; includeSubDomains` and/or `; preload`, or the empty string.
    pub fn directive_suffix(&self) -> &str {
        &self.directive_suffix
    }

    /// Whether an expiry is set and still ahead of `now`.
    pub fn has_future_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires > now)
    }

    /// Header value for the given number of seconds.
    pub fn render(&self, max_age: i64) -> String {
        format!("max-age={}{}", max_age, self.directive_suffix)
    }
}

fn build_suffix(settings: &HstsSettings) -> String {
    let directives = [
        (settings.include_subdomains, Directive::IncludeSubDomains),
        (settings.send_preload_directive, Directive::Preload),
    ];

    let mut suffix = String::new();
    for (_, directive) in directives.iter().filter(|(enabled, _)| *enabled) {
        suffix.push_str("; ");
        suffix.push_str(directive.as_str());
    }
    suffix
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_suffix_combinations() {
        let cases = [
            (false, false, ""),
            (true, false, "; includeSubDomains"),
            (false, true, "; preload"),
            (true, true, "; includeSubDomains; preload"),
        ];

        for (subdomains, preload, expected) in cases {
            let settings = HstsSettings {
                include_subdomains: subdomains,
                send_preload_directive: preload,
                ..HstsSettings::new(60)
            };
            let policy = HstsPolicy::configure(&settings).unwrap();
            assert_eq!(policy.directive_suffix(), expected);
        }
    }

    #[test]
    fn test_configure_copies_values() {
        let expires = Utc::now() + TimeDelta::days(30);
        let settings = HstsSettings::new(31_536_000).with_expires(expires);
        let policy = HstsPolicy::configure(&settings).unwrap();

        assert_eq!(policy.max_age(), 31_536_000);
        assert_eq!(policy.expires(), Some(expires));
        assert_eq!(policy.render(policy.max_age()), "max-age=31536000");
    }

    #[test]
    fn test_zero_max_age_is_valid() {
        let policy = HstsPolicy::configure(&HstsSettings::new(0)).unwrap();
        assert_eq!(policy.render(0), "max-age=0");
    }

    #[test]
    fn test_negative_max_age_rejected() {
        let err = HstsPolicy::configure(&HstsSettings::new(-1)).unwrap_err();
        assert_eq!(err, HstsError::InvalidMaxAge(-1));
        assert_eq!(
            err.to_string(),
            "HSTS max-age can't be less than zero (got -1)"
        );
    }

    #[test]
    fn test_reconfigure_rebuilds_suffix() {
        let settings = HstsSettings::new(3600).with_include_subdomains().with_preload();
        let mut policy = HstsPolicy::configure(&settings).unwrap();

        policy.reconfigure(&settings).unwrap();
        policy.reconfigure(&settings).unwrap();
        assert_eq!(policy.directive_suffix(), "; includeSubDomains; preload");

        policy.reconfigure(&HstsSettings::new(3600)).unwrap();
        assert_eq!(policy.directive_suffix(), "");
    }

    #[test]
    fn test_failed_reconfigure_keeps_state() {
        let settings = HstsSettings::new(100).with_include_subdomains();
        let mut policy = HstsPolicy::configure(&settings).unwrap();
        let before = policy.clone();

        let bad = HstsSettings::new(-5).with_preload();
        assert_eq!(
            policy.reconfigure(&bad),
            Err(HstsError::InvalidMaxAge(-5))
        );
        assert_eq!(policy, before);
    }

    #[test]
    fn test_has_future_expiry() {
        let now = Utc::now();

        let unset = HstsPolicy::configure(&HstsSettings::new(10)).unwrap();
        assert!(!unset.has_future_expiry(now));

        let past = HstsPolicy::configure(
            &HstsSettings::new(10).with_expires(now - TimeDelta::seconds(1)),
        )
        .unwrap();
        assert!(!past.has_future_expiry(now));

        let exact = HstsPolicy::configure(&HstsSettings::new(10).with_expires(now)).unwrap();
        assert!(!exact.has_future_expiry(now));

        let future = HstsPolicy::configure(
            &HstsSettings::new(10).with_expires(now + TimeDelta::seconds(1)),
        )
        .unwrap();
        assert!(future.has_future_expiry(now));
    }

    #[test]
    fn test_directive_display() {
        assert_eq!(Directive::IncludeSubDomains.to_string(), "includeSubDomains");
        assert_eq!(Directive::Preload.to_string(), "preload");
    }
}

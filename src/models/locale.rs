use std::fmt;
use crate::config::ApiConfig;

const LOCALE_PLACEHOLDER: &str = "{locale}";
const WORLD_SUBDOMAIN: &str = "world";

/// Which regional Open Food Facts dataset a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Worldwide,
    Country(String),
}

impl Locale {
    /// `None` or a blank code selects the worldwide dataset.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(c) if !c.is_empty() => Locale::Country(c.to_string()),
            _ => Locale::Worldwide,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Locale::Worldwide => "Worldwide",
            Locale::Country(code) => code,
        }
    }

    pub fn subdomain(&self) -> String {
        match self {
            Locale::Worldwide => WORLD_SUBDOMAIN.to_string(),
            Locale::Country(code) => code.to_lowercase(),
        }
    }

    pub fn country_code(&self) -> Option<&str> {
        match self {
            Locale::Worldwide => None,
            Locale::Country(code) => Some(code),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base URLs for one locale. Built per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub cgi_search: String,
}

impl Endpoints {
    pub fn for_locale(api: &ApiConfig, locale: &Locale) -> Self {
        let subdomain = locale.subdomain();
        Self {
            api_base: api.api_url_template.replace(LOCALE_PLACEHOLDER, &subdomain),
            cgi_search: api.cgi_url_template.replace(LOCALE_PLACEHOLDER, &subdomain),
        }
    }

    pub fn search(&self) -> String {
        format!("{}/search", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_locale_targets_its_subdomain() {
        let api = ApiConfig::default();
        let endpoints = Endpoints::for_locale(&api, &Locale::from_code(Some("DE")));
        assert_eq!(endpoints.api_base, "https://de.openfoodfacts.org/api/v2");
        assert_eq!(endpoints.cgi_search, "https://de.openfoodfacts.org/cgi/search.pl");
        assert_eq!(endpoints.search(), "https://de.openfoodfacts.org/api/v2/search");
    }

    #[test]
    fn resetting_to_none_restores_worldwide_defaults() {
        let api = ApiConfig::default();
        let default_endpoints = Endpoints::for_locale(&api, &Locale::default());

        let french = Endpoints::for_locale(&api, &Locale::from_code(Some("fr")));
        assert_ne!(french, default_endpoints);

        let reset = Locale::from_code(None);
        assert_eq!(reset.label(), "Worldwide");
        assert_eq!(reset.to_string(), "Worldwide");
        assert_eq!(Endpoints::for_locale(&api, &reset), default_endpoints);
        assert_eq!(default_endpoints.api_base, "https://world.openfoodfacts.org/api/v2");
        assert_eq!(Locale::from_code(Some("  ")), Locale::Worldwide);
    }

    #[test]
    fn label_reports_the_active_code() {
        let locale = Locale::from_code(Some("IT"));
        assert_eq!(locale.label(), "IT");
        assert_eq!(locale.country_code(), Some("IT"));
        assert_eq!(Locale::Worldwide.country_code(), None);
    }
}

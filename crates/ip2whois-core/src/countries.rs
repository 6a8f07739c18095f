//! Static country tables used for local analysis and for naming country codes.

/// Country code for a country-code top-level domain (lowercase, no dot).
#[must_use]
pub fn tld_country(tld: &str) -> Option<&'static str> {
    match tld {
        "us" => Some("US"),
        "uk" => Some("GB"),
        "ca" => Some("CA"),
        "au" => Some("AU"),
        "de" => Some("DE"),
        "fr" => Some("FR"),
        "jp" => Some("JP"),
        "cn" => Some("CN"),
        "in" => Some("IN"),
        "br" => Some("BR"),
        "ru" => Some("RU"),
        "it" => Some("IT"),
        "es" => Some("ES"),
        "nl" => Some("NL"),
        "se" => Some("SE"),
        _ => None,
    }
}

/// English name for a two-letter country code, if the table knows it.
#[must_use]
pub fn known_country_name(code: &str) -> Option<&'static str> {
    match code {
        "US" => Some("United States"),
        "GB" => Some("United Kingdom"),
        "CA" => Some("Canada"),
        "AU" => Some("Australia"),
        "DE" => Some("Germany"),
        "FR" => Some("France"),
        "JP" => Some("Japan"),
        "CN" => Some("China"),
        "IN" => Some("India"),
        "BR" => Some("Brazil"),
        "RU" => Some("Russia"),
        "IT" => Some("Italy"),
        "ES" => Some("Spain"),
        "NL" => Some("Netherlands"),
        "SE" => Some("Sweden"),
        _ => None,
    }
}

/// Display name for a country code: the table entry, or the code itself.
///
/// Blank codes have no name.
#[must_use]
pub fn country_name(code: Option<&str>) -> Option<String> {
    let code = code.map(str::trim).filter(|c| !c.is_empty())?;
    Some(known_country_name(code).map_or_else(|| code.to_string(), str::to_string))
}

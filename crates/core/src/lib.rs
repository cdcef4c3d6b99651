pub mod country {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use thiserror::Error;

    /// One country record as served by the REST Countries v3.1 API.
    /// Several fields are absent for some territories, so anything the
    /// API may omit defaults to empty.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Country {
        pub name: CountryName,
        #[serde(default)]
        pub tld: Vec<String>,
        pub cca3: String,
        #[serde(default)]
        pub currencies: BTreeMap<String, Currency>,
        #[serde(default)]
        pub capital: Vec<String>,
        #[serde(default)]
        pub region: String,
        #[serde(default)]
        pub subregion: Option<String>,
        #[serde(default)]
        pub languages: BTreeMap<String, String>,
        #[serde(default)]
        pub borders: Vec<String>,
        #[serde(default)]
        pub population: u64,
        #[serde(default)]
        pub flags: Flags,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CountryName {
        pub common: String,
        pub official: String,
        #[serde(default, rename = "nativeName")]
        pub native_name: BTreeMap<String, NativeName>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct NativeName {
        pub official: String,
        pub common: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Currency {
        pub name: String,
        #[serde(default)]
        pub symbol: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct Flags {
        #[serde(default)]
        pub png: String,
        #[serde(default)]
        pub svg: String,
        #[serde(default)]
        pub alt: Option<String>,
    }

    impl Country {
        /// Official native name from the first native-name entry, or the
        /// official name when the record carries none.
        pub fn native_name(&self) -> &str {
            self.name
                .native_name
                .values()
                .next()
                .map(|n| n.official.as_str())
                .unwrap_or(&self.name.official)
        }

        pub fn capital_label(&self) -> String {
            if self.capital.is_empty() {
                "-".to_string()
            } else {
                self.capital.join(", ")
            }
        }

        pub fn currency_names(&self) -> String {
            let names: Vec<&str> = self.currencies.values().map(|c| c.name.as_str()).collect();
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(", ")
            }
        }

        pub fn language_names(&self) -> String {
            let names: Vec<&str> = self.languages.values().map(|l| l.as_str()).collect();
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(", ")
            }
        }

        pub fn top_level_domain(&self) -> &str {
            self.tld.first().map(String::as_str).unwrap_or("-")
        }
    }

    /// A resolved border entry: the alpha code plus the display name it
    /// resolves to. Carrying the code keeps navigation independent of
    /// whatever string the UI happens to render.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BorderLink {
        pub code: String,
        pub name: String,
    }

    /// The four URL shapes the API serves.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum CountryQuery {
        All,
        Name(String),
        Region(String),
        Alpha(String),
    }

    impl CountryQuery {
        /// Path segments under the API base; the trailing segment is
        /// user input and must be percent-encoded by the client.
        pub fn segments(&self) -> (&'static str, Option<&str>) {
            match self {
                CountryQuery::All => ("all", None),
                CountryQuery::Name(n) => ("name", Some(n)),
                CountryQuery::Region(r) => ("region", Some(r)),
                CountryQuery::Alpha(c) => ("alpha", Some(c)),
            }
        }
    }

    /// Regions the v3.1 `/region/{region}` endpoint answers for.
    pub const REGIONS: &[&str] = &[
        "Africa",
        "Americas",
        "Antarctic",
        "Asia",
        "Europe",
        "Oceania",
    ];

    /// Multi-result responses render in non-decreasing order of common
    /// name; equal keys keep response order (stable sort).
    pub fn sort_by_common_name(countries: &mut [Country]) {
        if countries.len() > 1 {
            countries.sort_by(|a, b| a.name.common.cmp(&b.name.common));
        }
    }

    #[derive(Error, Debug)]
    pub enum LookupError {
        #[error("country not found")] NotFound,
        #[error("network: {0}")] Network(String),
        #[error("timeout: {0}")] Timeout(String),
        #[error("decode: {0}")] Decode(String),
        #[error("other: {0}")] Other(String),
    }

    #[allow(async_fn_in_trait)]
    pub trait CountrySource: Send + Sync {
        /// Fetch and sort every record matching `query`.
        async fn fetch_countries(&self, query: &CountryQuery)
            -> Result<Vec<Country>, LookupError>;
        /// Fetch exactly one record by alpha code.
        async fn fetch_by_code(&self, code: &str) -> Result<Country, LookupError>;
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn country(common: &str) -> Country {
            serde_json::from_value(serde_json::json!({
                "name": { "common": common, "official": common },
                "cca3": "XXX",
            }))
            .unwrap()
        }

        #[test]
        fn multi_result_sorts_by_common_name() {
            let mut all = vec![country("Peru"), country("Chad"), country("Fiji")];
            sort_by_common_name(&mut all);
            let names: Vec<&str> = all.iter().map(|c| c.name.common.as_str()).collect();
            assert_eq!(names, ["Chad", "Fiji", "Peru"]);
        }

        #[test]
        fn sort_keeps_response_order_for_equal_names() {
            let mut a = country("Samoa");
            a.cca3 = "WSM".into();
            let mut b = country("Samoa");
            b.cca3 = "ASM".into();
            let mut all = vec![a, b];
            sort_by_common_name(&mut all);
            assert_eq!(all[0].cca3, "WSM");
            assert_eq!(all[1].cca3, "ASM");
        }

        #[test]
        fn query_segments_cover_all_four_shapes() {
            assert_eq!(CountryQuery::All.segments(), ("all", None));
            assert_eq!(
                CountryQuery::Name("costa rica".into()).segments(),
                ("name", Some("costa rica"))
            );
            assert_eq!(
                CountryQuery::Region("Europe".into()).segments(),
                ("region", Some("Europe"))
            );
            assert_eq!(
                CountryQuery::Alpha("DEU".into()).segments(),
                ("alpha", Some("DEU"))
            );
        }

        #[test]
        fn v31_record_deserializes() {
            let doc = serde_json::json!({
                "name": {
                    "common": "Germany",
                    "official": "Federal Republic of Germany",
                    "nativeName": {
                        "deu": {
                            "official": "Bundesrepublik Deutschland",
                            "common": "Deutschland"
                        }
                    }
                },
                "tld": [".de"],
                "cca3": "DEU",
                "currencies": { "EUR": { "name": "Euro", "symbol": "€" } },
                "capital": ["Berlin"],
                "region": "Europe",
                "subregion": "Western Europe",
                "languages": { "deu": "German" },
                "borders": ["AUT", "BEL", "CZE"],
                "population": 83240525u64,
                "flags": { "png": "https://flagcdn.com/w320/de.png",
                           "svg": "https://flagcdn.com/de.svg" }
            });
            let c: Country = serde_json::from_value(doc).unwrap();
            assert_eq!(c.cca3, "DEU");
            assert_eq!(c.native_name(), "Bundesrepublik Deutschland");
            assert_eq!(c.currency_names(), "Euro");
            assert_eq!(c.language_names(), "German");
            assert_eq!(c.top_level_domain(), ".de");
            assert_eq!(c.borders, ["AUT", "BEL", "CZE"]);
        }

        #[test]
        fn sparse_record_defaults_to_empty_fields() {
            let c = country("Bouvet Island");
            assert_eq!(c.capital_label(), "-");
            assert_eq!(c.currency_names(), "-");
            assert_eq!(c.language_names(), "-");
            assert_eq!(c.top_level_domain(), "-");
            assert!(c.borders.is_empty());
            assert_eq!(c.native_name(), "Bouvet Island");
        }
    }
}

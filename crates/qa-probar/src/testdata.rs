//! Static test data shipped with the crate (`data/testdata.json`).

use crate::result::ProbeResult;
use serde::Deserialize;
use std::sync::OnceLock;

const TESTDATA_JSON: &str = include_str!("../data/testdata.json");

/// Expected submenu entries of the multi-level dropdown
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLevelDropdownData {
    /// Entries under Settings
    pub expected_settings_sub_menu: Vec<String>,
    /// Entries under Animals
    pub expected_animals_sub_menu: Vec<String>,
}

/// Contents of `testdata.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestData {
    /// Dropdown expectations
    pub multi_level_dropdown: MultiLevelDropdownData,
    /// Navigation menu entries, in visiting order
    pub navigation_menu_pages: Vec<String>,
}

impl TestData {
    /// Parse test data from JSON text
    pub fn from_json(json: &str) -> ProbeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The bundled test data, parsed on first use
pub fn testdata() -> ProbeResult<&'static TestData> {
    static DATA: OnceLock<TestData> = OnceLock::new();
    if let Some(data) = DATA.get() {
        return Ok(data);
    }
    let parsed = TestData::from_json(TESTDATA_JSON)?;
    Ok(DATA.get_or_init(|| parsed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_data() {
        let data = testdata().unwrap();
        assert_eq!(
            data.multi_level_dropdown.expected_settings_sub_menu,
            vec!["HTML", "CSS", "JavaScript", "Awesome!"]
        );
        assert_eq!(data.multi_level_dropdown.expected_animals_sub_menu.len(), 4);
        assert_eq!(data.navigation_menu_pages[0], "About");
    }

    #[test]
    fn test_parsed_once() {
        let a = testdata().unwrap() as *const TestData;
        let b = testdata().unwrap() as *const TestData;
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(TestData::from_json(r#"{"navigationMenuPages": []}"#).is_err());
    }
}

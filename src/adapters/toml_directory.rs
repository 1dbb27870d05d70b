use crate::adapters::memory::MemoryResidentDirectory;
use crate::domain::model::Resident;
use crate::utils::error::{EntregadorError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Resident roster file:
///
/// ```toml
/// [[residents]]
/// apartment_number = "101"
/// occupants = [{ name = "Maria Silva", phone = "+5511999998888" }]
/// ```
#[derive(Debug, Deserialize)]
struct ResidentRoster {
    #[serde(default)]
    residents: Vec<Resident>,
}

pub fn load_residents_file<P: AsRef<Path>>(path: P) -> Result<MemoryResidentDirectory> {
    let content = std::fs::read_to_string(&path)?;
    let residents = parse_residents(&content)?;

    tracing::info!(
        path = %path.as_ref().display(),
        "Loaded {} resident records",
        residents.len()
    );
    Ok(MemoryResidentDirectory::from_residents(residents))
}

pub fn parse_residents(content: &str) -> Result<Vec<Resident>> {
    let roster: ResidentRoster =
        toml::from_str(content).map_err(|e| EntregadorError::ConfigValidationError {
            field: "residents".to_string(),
            message: format!("TOML parsing error: {}", e),
        })?;

    let mut seen = HashSet::new();
    for resident in &roster.residents {
        validate_non_empty_string("residents.apartment_number", &resident.apartment_number)?;
        if !seen.insert(resident.apartment_number.as_str()) {
            return Err(EntregadorError::ConfigValidationError {
                field: "residents.apartment_number".to_string(),
                message: format!(
                    "apartment {} is listed more than once",
                    resident.apartment_number
                ),
            });
        }
    }

    Ok(roster.residents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RequestContext;
    use crate::domain::ports::ResidentDirectory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROSTER: &str = r#"
[[residents]]
apartment_number = "101"
occupants = [
    { name = "Maria Silva", phone = "+5511999998888" },
    { name = "João Silva", phone = "+5511977776666" },
]

[[residents]]
apartment_number = "102"
"#;

    #[test]
    fn test_parse_residents() {
        let residents = parse_residents(ROSTER).unwrap();

        assert_eq!(residents.len(), 2);
        assert_eq!(residents[0].occupants.len(), 2);
        assert_eq!(residents[0].occupants[0].phone, "+5511999998888");
        assert!(residents[1].occupants.is_empty());
    }

    #[test]
    fn test_parse_rejects_duplicate_apartments() {
        let content = r#"
[[residents]]
apartment_number = "101"

[[residents]]
apartment_number = "101"
"#;
        let err = parse_residents(content).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_parse_rejects_invalid_toml() {
        assert!(parse_residents("[[residents]\napartment_number = ").is_err());
    }

    #[tokio::test]
    async fn test_load_residents_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();

        let directory = load_residents_file(file.path()).unwrap();
        let resident = directory
            .find_by_apartment(&RequestContext::new(), "101")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resident.occupants[1].name, "João Silva");
    }
}

//! PubChem PUG-REST name lookup.

use super::lookup::{LookupError, PropertyBundle, StructureLookup};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

const PROPERTIES: &str = "CanonicalSMILES,IUPACName,MolecularFormula,MolecularWeight";

/// Settings for the external structure lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// PUG-REST root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between unsuccessful alias attempts of one entry.
    pub delay: Duration,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            delay: Duration::from_millis(500),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blocking PubChem client.
pub struct PubChemClient {
    http: Client,
    base_url: String,
}

impl PubChemClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn property_url(&self, alias: &str) -> String {
        format!(
            "{}/compound/name/{}/property/{}/JSON",
            self.base_url,
            urlencoding::encode(alias),
            PROPERTIES
        )
    }
}

impl StructureLookup for PubChemClient {
    fn service_name(&self) -> &str {
        "PubChem"
    }

    fn lookup_by_name(&self, alias: &str) -> Result<Option<PropertyBundle>, LookupError> {
        let url = self.property_url(alias);
        tracing::debug!(%url, "querying PubChem");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                alias: alias.to_string(),
            });
        }

        let body = response.text()?;
        parse_properties(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<Properties>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(rename = "CanonicalSMILES")]
    canonical_smiles: Option<String>,
    #[serde(rename = "ConnectivitySMILES")]
    connectivity_smiles: Option<String>,
    #[serde(rename = "SMILES")]
    smiles: Option<String>,
    #[serde(rename = "IUPACName")]
    iupac_name: Option<String>,
    #[serde(rename = "MolecularFormula")]
    molecular_formula: Option<String>,
    #[serde(rename = "MolecularWeight")]
    molecular_weight: Option<Weight>,
}

/// PubChem reports weights as strings, older records as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Weight {
    Text(String),
    Number(f64),
}

impl Weight {
    fn into_label(self) -> String {
        match self {
            Weight::Text(text) => text,
            Weight::Number(value) => value.to_string(),
        }
    }
}

/// Extracts the first property row of a PUG-REST property response.
pub fn parse_properties(body: &str) -> Result<Option<PropertyBundle>, LookupError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let Some(row) = envelope.property_table.properties.into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(PropertyBundle {
        structure: row
            .canonical_smiles
            .or(row.connectivity_smiles)
            .or(row.smiles),
        name: row.iupac_name,
        formula: row.molecular_formula,
        weight: row.molecular_weight.map(Weight::into_label),
    }))
}

use serde::{Deserialize, Serialize};

use crate::domain::PersonaId;

/// A persisted persona record. The `idPersona`/`nombre` field names are the
/// backend's wire contract; ids are assigned by the backend and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(rename = "idPersona")]
    pub id: PersonaId,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Create payload: carries only the name. A record without an assigned id is
/// never a `Persona`; it only exists as a draft on its way to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDraft {
    #[serde(rename = "nombre")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_uses_backend_field_names() {
        let persona = Persona {
            id: PersonaId(3),
            name: "Ana".to_string(),
        };
        let json = serde_json::to_value(&persona).expect("serialize");
        assert_eq!(json, serde_json::json!({"idPersona": 3, "nombre": "Ana"}));
    }

    #[test]
    fn draft_carries_only_the_name() {
        let draft = PersonaDraft {
            name: "Luis".to_string(),
        };
        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(json, serde_json::json!({"nombre": "Luis"}));
    }
}

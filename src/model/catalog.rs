//! The read-only candidate catalog: the ground truth against which selections are checked.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rocket::serde::json::serde_json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::common::{CandidateId, Category};

/// A candidate standing in exactly one category.
///
/// Vote counts are deliberately absent: they are derived from the ballot log
/// and only ever reported alongside a candidate, see [`crate::model::api::CandidateDesc`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_description: Option<String>,
    pub category: Category,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate candidate ID '{0}'")]
    DuplicateCandidate(CandidateId),
    #[error("Candidate with an empty ID")]
    EmptyId,
    #[error("Catalog file lists no candidates")]
    NoCandidates,
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// The fixed set of candidates for a voting session.
#[derive(Debug, Clone)]
pub struct Catalog {
    candidates: Vec<Candidate>,
    index: HashMap<CandidateId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or empty IDs.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if index.insert(candidate.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCandidate(candidate.id.clone()));
            }
        }
        Ok(Self { candidates, index })
    }

    /// Load a catalog from a JSON array of candidates. The array must not be empty.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(path)?);
        let candidates: Vec<Candidate> = serde_json::from_reader(reader)?;
        let catalog = Self::new(candidates)?;
        if catalog.is_empty() {
            return Err(CatalogError::NoCandidates);
        }
        Ok(catalog)
    }

    /// Full snapshot of the catalog.
    pub fn list_candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Point lookup by ID.
    pub fn find_candidate(&self, id: &str) -> Option<&Candidate> {
        self.index.get(id).map(|&i| &self.candidates[i])
    }

    /// All candidates standing in the given category.
    pub fn candidates_in(&self, category: Category) -> impl Iterator<Item = &Candidate> {
        self.candidates
            .iter()
            .filter(move |candidate| candidate.category == category)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The built-in roster: three candidates in each category.
    pub fn builtin() -> Self {
        let roster = [
            (
                "pres-1",
                "Alan García Pérez",
                "Ex Presidente del Perú (1985-1990, 2006-2011). Abogado y político con amplia trayectoria en la política nacional. Líder del Partido Aprista Peruano.",
                "Partido Aprista Peruano",
                "Partido político histórico del Perú fundado por Víctor Raúl Haya de la Torre",
                Category::Presidential,
            ),
            (
                "pres-2",
                "Ollanta Humala Tasso",
                "Ex Presidente del Perú (2011-2016). Militar retirado y político. Líder del Partido Nacionalista Peruano.",
                "Partido Nacionalista Peruano",
                "Partido político de izquierda nacionalista",
                Category::Presidential,
            ),
            (
                "pres-3",
                "Keiko Fujimori Higuchi",
                "Política peruana, ex Congresista y líder de Fuerza Popular. Hija del ex Presidente Alberto Fujimori.",
                "Fuerza Popular",
                "Partido político de centro-derecha",
                Category::Presidential,
            ),
            (
                "dist-1",
                "Jorge Muñoz Wells",
                "Ex Alcalde de Lima (2019-2022). Ingeniero y político con experiencia en gestión municipal y desarrollo urbano.",
                "Acción Popular",
                "Partido político histórico del Perú",
                Category::District,
            ),
            (
                "dist-2",
                "Susana Villarán",
                "Ex Alcaldesa de Lima (2011-2014). Defensora de derechos humanos y líder social con amplia trayectoria en organizaciones civiles.",
                "Fuerza Social",
                "Movimiento político de izquierda",
                Category::District,
            ),
            (
                "dist-3",
                "Luis Castañeda Lossio",
                "Ex Alcalde de Lima (2003-2010, 2015-2018). Médico y político con experiencia en gestión municipal y obras públicas.",
                "Solidaridad Nacional",
                "Partido político de centro",
                Category::District,
            ),
            (
                "reg-1",
                "Yván Vásquez Valera",
                "Ex Presidente Regional de Loreto. Ingeniero forestal con experiencia en desarrollo regional y gestión de recursos naturales.",
                "Movimiento Independiente Loreto",
                "Movimiento político regional",
                Category::Regional,
            ),
            (
                "reg-2",
                "Yamila Osorio Delgado",
                "Ex Presidenta Regional de Arequipa. Ingeniera y política con experiencia en gestión pública y desarrollo económico regional.",
                "Alianza para el Progreso",
                "Partido político de centro-derecha",
                Category::Regional,
            ),
            (
                "reg-3",
                "César Álvarez Aguilar",
                "Ex Presidente Regional de Áncash. Abogado y político con experiencia en gestión regional y desarrollo local.",
                "Movimiento Independiente Regional",
                "Movimiento político regional",
                Category::Regional,
            ),
        ];
        let candidates = roster
            .into_iter()
            .map(
                |(id, name, description, party, party_description, category)| Candidate {
                    id: id.to_string(),
                    name: name.to_string(),
                    party_name: party.to_string(),
                    description: description.to_string(),
                    party_description: Some(party_description.to_string()),
                    category,
                },
            )
            .collect();
        // IDs above are distinct and non-empty.
        Self::new(candidates).expect("built-in catalog is well-formed")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_per_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 9);
        for category in Category::ALL {
            assert_eq!(catalog.candidates_in(category).count(), 3);
        }
    }

    #[test]
    fn lookup() {
        let catalog = Catalog::builtin();
        let candidate = catalog.find_candidate("dist-1").unwrap();
        assert_eq!(candidate.category, Category::District);
        assert_eq!(candidate.name, "Jorge Muñoz Wells");
        assert!(candidate.description.starts_with("Ex Alcalde de Lima"));
        assert_eq!(
            candidate.party_description.as_deref(),
            Some("Partido político histórico del Perú")
        );
        assert!(catalog.find_candidate("unknown-id").is_none());
    }

    #[test]
    fn builtin_roster_is_described() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog
            .list_candidates()
            .iter()
            .all(|candidate| !candidate.description.is_empty()
                && candidate.party_description.is_some()));
    }

    #[test]
    fn catalog_file_must_list_candidates() {
        let path = std::env::temp_dir().join(format!("urna-empty-catalog-{}.json", std::process::id()));
        std::fs::write(&path, "[]").unwrap();
        let result = Catalog::from_json_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(CatalogError::NoCandidates)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            Candidate::example("a", Category::Regional),
            Candidate::example("a", Category::District),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateCandidate(id)) if id == "a"));

        let result = Catalog::new(vec![Candidate::example("", Category::Regional)]);
        assert!(matches!(result, Err(CatalogError::EmptyId)));
    }

    #[test]
    fn json_catalog_rejects_unknown_category() {
        let json = r#"[{"id": "x", "name": "X", "party_name": "P", "category": "municipal"}]"#;
        assert!(serde_json::from_str::<Vec<Candidate>>(json).is_err());

        let json = r#"[{"id": "x", "name": "X", "party_name": "P", "category": "regional"}]"#;
        let candidates = serde_json::from_str::<Vec<Candidate>>(json).unwrap();
        let catalog = Catalog::new(candidates).unwrap();
        assert_eq!(catalog.find_candidate("x").unwrap().category, Category::Regional);
    }
}

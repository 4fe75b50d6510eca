use std::collections::HashSet;

/// One recognized document type and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub type_name: String,
    pub category: String,
}

impl CatalogEntry {
    pub fn new(type_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            category: category.into(),
        }
    }
}

/// Immutable, ordered registry of the recognized document types.
///
/// Loaded once at startup and shared read-only across concurrent pipeline
/// invocations. Entry order is significant: it drives prompt rendering and
/// fallback tie-breaking.
#[derive(Debug, Clone)]
pub struct DocumentTypeCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate document type: {0}")]
    DuplicateType(String),
    #[error("empty type name at position {0}")]
    EmptyTypeName(usize),
    #[error("empty category for type: {0}")]
    EmptyCategory(String),
}

impl DocumentTypeCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.type_name.trim().is_empty() {
                return Err(CatalogError::EmptyTypeName(position));
            }
            if entry.category.trim().is_empty() {
                return Err(CatalogError::EmptyCategory(entry.type_name.clone()));
            }
            if !seen.insert(entry.type_name.as_str()) {
                return Err(CatalogError::DuplicateType(entry.type_name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in catalog: 40 French administrative/financial document
    /// types across 8 categories.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(type_name, category)| CatalogEntry::new(*type_name, *category))
            .collect();
        Self::new(entries).expect("builtin catalog entries are unique and non-empty")
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.iter().any(|e| e.type_name == type_name)
    }

    pub fn category_of(&self, type_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.type_name == type_name)
            .map(|e| e.category.as_str())
    }

    /// Position of a type in catalog order. Lower positions win fallback ties.
    pub fn position(&self, type_name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.type_name == type_name)
    }

    /// Types grouped under their category, categories in first-appearance
    /// order and types in catalog order within each group.
    pub fn grouped_by_category(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(c, _)| *c == entry.category) {
                Some((_, types)) => types.push(entry.type_name.as_str()),
                None => groups.push((entry.category.as_str(), vec![entry.type_name.as_str()])),
            }
        }
        groups
    }
}

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("CV(s) du(des) associé(s)", "Associates"),
    ("Compromis de vente", "Object"),
    (
        "Bail ou projet de bail du bien objet de l'acquisition",
        "Object",
    ),
    ("Projet de statuts société emprunteur", "Company"),
    (
        "Organigramme des sociétés de la société emprunteur",
        "Company",
    ),
    ("KBIS société emprunteur", "Company"),
    ("Statuts société emprunteur", "Company"),
    ("PV d'AG autorisant la société à emprunter", "Company"),
    ("Liasses fiscales société emprunteur N-1", "Company"),
    ("Liasses fiscales société emprunteur N-2", "Company"),
    (
        "Bilan et compte de résultat détaillés de l'emprunteur N-1",
        "Company",
    ),
    (
        "Bilan et compte de résultat détaillés de l'emprunteur N-2",
        "Company",
    ),
    ("Avis d'imposition T+N-1", "Associates"),
    ("Avis d'imposition T+N-2", "Associates"),
    ("Tableau de remboursement d'emprunt", "Financing"),
    ("Attestation de prêt", "Financing"),
    ("Offre de prêt", "Financing"),
    ("Plan de financement prévisionnel", "Financing"),
    ("RIB de l'emprunteur", "Company"),
    ("Pièce d'identité du représentant légal", "Associates"),
    ("Attestation d'assurance", "Financing"),
    (
        "Bilans et comptes de résultat de la société contrôlée N-1",
        "Company",
    ),
    (
        "Bilans et comptes de résultat de la société contrôlée N-2",
        "Company",
    ),
    (
        "Bilans et comptes de résultat de la société contrôlée N-3",
        "Company",
    ),
    ("Devis des travaux prévisionnels", "Works"),
    ("Factures d'acompte travaux", "Works"),
    ("Facture finale des travaux", "Works"),
    ("Attestation de fin de travaux", "Works"),
    ("Diagnostic de performance énergétique", "Diagnostics"),
    ("Diagnostic amiante", "Diagnostics"),
    ("Diagnostic plomb", "Diagnostics"),
    ("Diagnostic termites", "Diagnostics"),
    ("Diagnostic gaz", "Diagnostics"),
    ("Diagnostic électricité", "Diagnostics"),
    ("État des lieux d'entrée", "Location"),
    ("État des lieux de sortie", "Location"),
    ("Inventaire du mobilier", "Location"),
    ("Contrat de réservation du logement", "Sale"),
    ("Acte de vente définitif", "Sale"),
    ("Extrait du plan cadastral", "Sale"),
];

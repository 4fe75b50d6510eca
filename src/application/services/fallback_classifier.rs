use std::sync::Arc;

use crate::domain::{ClassificationMethod, ClassificationResult, DocumentTypeCatalog};

/// Deterministic keyword classifier used when the model path is unavailable
/// or returns unusable output. No external calls; always yields a result.
pub struct FallbackClassifier {
    catalog: Arc<DocumentTypeCatalog>,
    confidence: f32,
}

impl FallbackClassifier {
    pub fn new(catalog: Arc<DocumentTypeCatalog>, confidence: f32) -> Self {
        Self {
            catalog,
            confidence,
        }
    }

    /// Scan the text for per-type trigger keywords and pick the type with
    /// the most distinct hits. Each keyword counts once regardless of how
    /// often it repeats, so long documents gain no advantage. Ties go to the
    /// type appearing earliest in catalog order; zero hits yields `Unknown`.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let haystack = text.to_lowercase();

        let mut best: Option<(usize, &str, usize)> = None;
        for (type_name, keywords) in KEYWORD_TABLE {
            // Table entries whose type is absent from the injected catalog
            // are skipped rather than trusted.
            let Some(position) = self.catalog.position(type_name) else {
                continue;
            };

            let hits = keywords.iter().filter(|k| haystack.contains(*k)).count();
            if hits == 0 {
                continue;
            }

            let replace = match best {
                None => true,
                Some((best_pos, _, best_hits)) => {
                    hits > best_hits || (hits == best_hits && position < best_pos)
                }
            };
            if replace {
                best = Some((position, type_name, hits));
            }
        }

        match best {
            Some((_, type_name, hits)) => {
                let category = self
                    .catalog
                    .category_of(type_name)
                    .unwrap_or(ClassificationResult::UNKNOWN)
                    .to_string();
                tracing::debug!(document_type = type_name, hits, "fallback keyword match");
                ClassificationResult {
                    document_type: type_name.to_string(),
                    category,
                    confidence: self.confidence,
                    method: ClassificationMethod::Fallback,
                    raw_model_output: None,
                }
            }
            None => {
                tracing::debug!("fallback found no keyword match");
                ClassificationResult::unknown()
            }
        }
    }
}

/// French trigger keywords for each catalog type, all lowercase. Matching is
/// substring-based over the lowercased text.
const KEYWORD_TABLE: &[(&str, &[&str])] = &[
    (
        "CV(s) du(des) associé(s)",
        &[
            "curriculum vitae",
            "expérience professionnelle",
            "parcours professionnel",
            "compétences",
            "diplômes",
        ],
    ),
    (
        "Compromis de vente",
        &[
            "compromis de vente",
            "promesse synallagmatique",
            "condition suspensive",
            "acquéreur",
        ],
    ),
    (
        "Bail ou projet de bail du bien objet de l'acquisition",
        &[
            "bail commercial",
            "bailleur",
            "preneur",
            "loyer",
            "locataire",
        ],
    ),
    (
        "Projet de statuts société emprunteur",
        &[
            "projet de statuts",
            "société en formation",
            "en cours de constitution",
        ],
    ),
    (
        "Organigramme des sociétés de la société emprunteur",
        &["organigramme", "détention du capital", "filiale", "holding"],
    ),
    (
        "KBIS société emprunteur",
        &[
            "kbis",
            "extrait kbis",
            "registre du commerce",
            "immatriculation",
            "greffe",
        ],
    ),
    (
        "Statuts société emprunteur",
        &["statuts", "objet social", "capital social", "siège social"],
    ),
    (
        "PV d'AG autorisant la société à emprunter",
        &[
            "procès-verbal",
            "assemblée générale",
            "résolution",
            "autorise la société à emprunter",
        ],
    ),
    (
        "Liasses fiscales société emprunteur N-1",
        &["liasse fiscale", "déclaration de résultats", "cerfa"],
    ),
    (
        "Liasses fiscales société emprunteur N-2",
        &["liasse fiscale", "déclaration de résultats"],
    ),
    (
        "Bilan et compte de résultat détaillés de l'emprunteur N-1",
        &["bilan", "compte de résultat", "actif", "passif"],
    ),
    (
        "Bilan et compte de résultat détaillés de l'emprunteur N-2",
        &["bilan", "compte de résultat", "exercice précédent"],
    ),
    (
        "Avis d'imposition T+N-1",
        &[
            "avis d'imposition",
            "impôt sur le revenu",
            "revenu fiscal de référence",
            "prélèvement à la source",
        ],
    ),
    (
        "Avis d'imposition T+N-2",
        &["avis d'imposition", "impôt sur le revenu"],
    ),
    (
        "Tableau de remboursement d'emprunt",
        &[
            "tableau d'amortissement",
            "capital restant dû",
            "échéance",
            "mensualité",
            "remboursement",
        ],
    ),
    (
        "Attestation de prêt",
        &["attestation de prêt", "atteste que le prêt"],
    ),
    (
        "Offre de prêt",
        &[
            "offre de prêt",
            "offre de crédit",
            "taux effectif global",
            "taeg",
            "durée du prêt",
        ],
    ),
    (
        "Plan de financement prévisionnel",
        &[
            "plan de financement",
            "apport personnel",
            "prévisionnel",
            "besoins et ressources",
        ],
    ),
    (
        "RIB de l'emprunteur",
        &[
            "relevé d'identité bancaire",
            "iban",
            "code banque",
            "domiciliation",
        ],
    ),
    (
        "Pièce d'identité du représentant légal",
        &[
            "carte nationale d'identité",
            "passeport",
            "pièce d'identité",
            "nationalité",
        ],
    ),
    (
        "Attestation d'assurance",
        &[
            "attestation d'assurance",
            "police d'assurance",
            "multirisque",
            "garanties souscrites",
        ],
    ),
    (
        "Bilans et comptes de résultat de la société contrôlée N-1",
        &["société contrôlée", "comptes consolidés", "participation"],
    ),
    (
        "Bilans et comptes de résultat de la société contrôlée N-2",
        &["société contrôlée", "comptes consolidés"],
    ),
    (
        "Bilans et comptes de résultat de la société contrôlée N-3",
        &["société contrôlée"],
    ),
    (
        "Devis des travaux prévisionnels",
        &["devis", "estimation des travaux", "montant ht", "travaux"],
    ),
    (
        "Factures d'acompte travaux",
        &["facture d'acompte", "acompte", "situation de travaux"],
    ),
    (
        "Facture finale des travaux",
        &["facture finale", "facture de solde", "solde des travaux"],
    ),
    (
        "Attestation de fin de travaux",
        &[
            "fin de travaux",
            "achèvement des travaux",
            "déclaration d'achèvement",
        ],
    ),
    (
        "Diagnostic de performance énergétique",
        &[
            "performance énergétique",
            "dpe",
            "classe énergie",
            "consommation énergétique",
            "gaz à effet de serre",
        ],
    ),
    ("Diagnostic amiante", &["amiante", "repérage amiante"]),
    ("Diagnostic plomb", &["plomb", "crep", "saturnisme"]),
    ("Diagnostic termites", &["termites", "état parasitaire"]),
    (
        "Diagnostic gaz",
        &["installation intérieure de gaz", "diagnostic gaz"],
    ),
    (
        "Diagnostic électricité",
        &[
            "installation intérieure d'électricité",
            "diagnostic électricité",
            "installation électrique",
        ],
    ),
    (
        "État des lieux d'entrée",
        &["état des lieux d'entrée", "entrée dans les lieux"],
    ),
    (
        "État des lieux de sortie",
        &["état des lieux de sortie", "restitution des clés"],
    ),
    (
        "Inventaire du mobilier",
        &["inventaire", "mobilier", "meublé"],
    ),
    (
        "Contrat de réservation du logement",
        &["contrat de réservation", "dépôt de garantie", "vefa"],
    ),
    (
        "Acte de vente définitif",
        &[
            "acte authentique",
            "acte de vente",
            "notaire",
            "publicité foncière",
        ],
    ),
    (
        "Extrait du plan cadastral",
        &["cadastral", "cadastre", "parcelle", "feuille"],
    ),
];

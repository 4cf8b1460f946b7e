//! Coarse routing of a user message to one of three business agents, each
//! of which searches only its own slice of the corpus.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use kbrag_core::error::Error;
use kbrag_core::types::CategoryFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessCategory {
    /// Product facts, dosing, clinical indications.
    #[default]
    Productos,
    /// Handling pushback: price, efficacy, safety, competitors.
    Objeciones,
    /// Sales arguments per specialty and patient profile.
    Argumentos,
}

impl BusinessCategory {
    pub const ALL: [BusinessCategory; 3] =
        [BusinessCategory::Productos, BusinessCategory::Objeciones, BusinessCategory::Argumentos];

    pub fn as_str(self) -> &'static str {
        match self {
            BusinessCategory::Productos => "productos",
            BusinessCategory::Objeciones => "objeciones",
            BusinessCategory::Argumentos => "argumentos",
        }
    }

    /// Corpus categories this agent may retrieve from.
    pub fn scope_categories(self) -> &'static [&'static str] {
        match self {
            BusinessCategory::Productos => &[
                "productos_linea_essential",
                "productos_linea_complex",
                "productos_linea_intense",
                "indicaciones_clinicas",
                "dosificacion_posologia",
                "tecnologia_calidad",
                "certificaciones",
                "diagnostico_omega3_index",
                "empresa_marca",
            ],
            BusinessCategory::Objeciones => &[
                "objeciones_precio",
                "objeciones_eficacia",
                "objeciones_seguridad",
                "comparativas_competencia",
                "tecnologia_calidad",
                "certificaciones",
            ],
            BusinessCategory::Argumentos => &[
                "argumentos_venta",
                "perfil_paciente",
                "comparativas_competencia",
                "indicaciones_clinicas",
                "empresa_marca",
            ],
        }
    }

    pub fn scope(self) -> CategoryFilter {
        self.scope_categories().iter().copied().collect()
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::NotFound(format!("business category '{}'", s.trim())))
    }
}

pub(crate) const OBJECTION_PATTERNS: &[&str] = &[
    r"\bcaro\b",
    r"\bcostoso\b",
    r"\bprecio\b",
    r"\bbarato\b",
    r"\bno funciona\b",
    r"\bno sirve\b",
    r"\bno veo resultado",
    r"\bmetales pesados\b",
    r"\bseguridad\b",
    r"\bseguro\b",
    r"\befecto.? secundario",
    r"\binteracci",
    r"\bcontraindicac",
    r"\botra marca\b",
    r"\bcompetencia\b",
    r"\bya uso\b",
    r"\bobjeci[oó]n",
    r"\bduda\b",
    r"\bpreocupa",
];

pub(crate) const ARGUMENT_PATTERNS: &[&str] = &[
    r"\bc[oó]mo vend",
    r"\bc[oó]mo present",
    r"\bargumento",
    r"\bcardi[oó]logo",
    r"\bginec[oó]logo",
    r"\bneur[oó]logo",
    r"\bpsiquiatra\b",
    r"\bpediatra\b",
    r"\breumat[oó]logo",
    r"\bespecialista\b",
    r"\bespecialidad\b",
    r"\bperfil.? de paciente",
    r"\bestrategi",
    r"\bdiferencia.* competencia",
    r"\bventaja",
];

pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static OBJECTIONS: Lazy<Vec<Regex>> = Lazy::new(|| compile(OBJECTION_PATTERNS));
static ARGUMENTS: Lazy<Vec<Regex>> = Lazy::new(|| compile(ARGUMENT_PATTERNS));

/// Route a message: objection patterns win over argument patterns, and
/// anything else is a product question.
pub fn classify_intent_rules(message: &str) -> BusinessCategory {
    let text = message.to_lowercase();
    if OBJECTIONS.iter().any(|re| re.is_match(&text)) {
        BusinessCategory::Objeciones
    } else if ARGUMENTS.iter().any(|re| re.is_match(&text)) {
        BusinessCategory::Argumentos
    } else {
        BusinessCategory::Productos
    }
}

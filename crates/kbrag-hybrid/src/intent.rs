//! Fine-grained intent labels used to bias fusion.
//!
//! Two ordered tables: multi-word phrases checked first (longest match
//! wins), then per-intent keyword lists scanned in order. Matching is by
//! substring over the normalized query with stopwords kept.

use kbrag_text::normalize::normalize_text;

/// Label of the potency intent that triggers the concentration override.
pub const CONCENTRATION: &str = "concentracion";

const PHRASES: &[(&str, &str)] = &[
    ("producto mas concentrado", CONCENTRATION),
    ("mayor concentracion", CONCENTRATION),
    ("mas concentrado", CONCENTRATION),
    ("mas potente", CONCENTRATION),
    ("mas fuerte", CONCENTRATION),
    ("durante el embarazo", "embarazo"),
    ("dosis en embarazo", "embarazo"),
    ("metales pesados", "seguridad"),
    ("efectos secundarios", "seguridad"),
    ("muy caro", "precio"),
    ("otra marca", "competencia"),
    ("omega 3 index", "diagnostico"),
    ("como presento", "argumentos"),
    ("como vendo", "argumentos"),
];

const KEYWORDS: &[(&str, &[&str])] = &[
    (CONCENTRATION, &["concentracion", "concentrado", "potente", "potencia", "intense"]),
    ("precio", &["precio", "caro", "costo", "barato", "economico"]),
    ("embarazo", &["embarazo", "embarazada", "gestacion", "prenatal", "lactancia"]),
    ("dosificacion", &["dosis", "posologia", "tomar", "capsulas"]),
    ("seguridad", &["seguridad", "metales", "mercurio", "contaminantes", "secundario"]),
    ("eficacia", &["resultado", "eficacia", "funciona", "sirve"]),
    ("competencia", &["competencia", "marca", "comparar", "comparativa"]),
    ("cardiovascular", &["corazon", "cardio", "colesterol", "triglicerido"]),
    ("argumentos", &["presento", "presentar", "vender", "argumento", "especialista"]),
    ("certificaciones", &["certificacion", "ifos", "gmp", "calidad"]),
    ("diagnostico", &["index", "test", "diagnostico"]),
];

#[derive(Debug, Clone)]
pub struct IntentDetector {
    phrases: Vec<(String, String)>,
    keywords: Vec<(String, Vec<String>)>,
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new(
            PHRASES.iter().map(|(p, l)| (*p, *l)),
            KEYWORDS.iter().map(|(l, ks)| (*l, ks.iter().copied())),
        )
    }
}

impl IntentDetector {
    /// Build from custom tables. Keyword entries keep their given order.
    pub fn new<P, K, KS, S>(phrases: P, keywords: K) -> Self
    where
        P: IntoIterator<Item = (S, S)>,
        K: IntoIterator<Item = (S, KS)>,
        KS: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(|(p, l)| (p.into(), l.into())).collect(),
            keywords: keywords
                .into_iter()
                .map(|(l, ks)| (l.into(), ks.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn detect(&self, query: &str) -> Option<&str> {
        let text = normalize_text(query);
        if text.is_empty() {
            return None;
        }
        let phrase = self
            .phrases
            .iter()
            .filter(|(p, _)| text.contains(p.as_str()))
            .fold(None::<&(String, String)>, |best, cand| match best {
                Some(b) if b.0.chars().count() >= cand.0.chars().count() => Some(b),
                _ => Some(cand),
            });
        if let Some((_, label)) = phrase {
            return Some(label.as_str());
        }
        self.keywords
            .iter()
            .find(|(_, ks)| ks.iter().any(|k| text.contains(k.as_str())))
            .map(|(label, _)| label.as_str())
    }

    pub fn keywords_for(&self, label: &str) -> &[String] {
        self.keywords.iter().find(|(l, _)| l == label).map_or(&[], |(_, ks)| ks.as_slice())
    }

    /// Whether a corpus category belongs to `label`: the category name
    /// contains the label or one of its keywords.
    pub fn matches_category(&self, label: &str, category: &str) -> bool {
        category.contains(label) || self.keywords_for(label).iter().any(|k| category.contains(k.as_str()))
    }
}

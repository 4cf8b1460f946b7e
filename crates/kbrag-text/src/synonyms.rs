//! Domain synonym table.
//!
//! Keys and values are normalized (lowercase, accent-folded, unstemmed).
//! Lists are ordered by relevance; callers cap how many they take.

use std::collections::HashMap;

const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("embarazo", &["gestacion", "prenatal", "embarazada", "lactancia"]),
    ("embarazada", &["embarazo", "gestacion", "prenatal"]),
    ("gestacion", &["embarazo", "prenatal", "embarazada"]),
    ("caro", &["precio", "costo", "costoso", "economico"]),
    ("costoso", &["caro", "precio", "costo"]),
    ("precio", &["costo", "caro", "economico"]),
    ("barato", &["economico", "precio", "costo"]),
    ("concentracion", &["concentrado", "potencia", "pureza"]),
    ("concentrado", &["concentracion", "potente", "pureza"]),
    ("potente", &["concentrado", "concentracion", "potencia"]),
    ("fuerte", &["potente", "concentrado", "concentracion"]),
    ("corazon", &["cardiovascular", "cardiaco", "cardiologo"]),
    ("cardiologo", &["cardiovascular", "corazon", "cardiaco"]),
    ("cardiovascular", &["corazon", "cardiaco", "cardiologo"]),
    ("colesterol", &["trigliceridos", "lipidos", "cardiovascular"]),
    ("trigliceridos", &["colesterol", "lipidos", "hipertrigliceridemia"]),
    ("dosis", &["posologia", "capsulas", "toma"]),
    ("posologia", &["dosis", "capsulas", "toma"]),
    ("cerebro", &["cognitivo", "neurologico", "memoria"]),
    ("memoria", &["cognitivo", "cerebro", "neurologico"]),
    ("inflamacion", &["inflamatorios", "antiinflamatorio", "resolucion"]),
    ("seguridad", &["metales", "contaminantes", "pureza"]),
    ("seguro", &["seguridad", "contaminantes", "pureza"]),
    ("mercurio", &["metales", "contaminantes", "pureza"]),
    ("eficacia", &["resultados", "efectividad", "evidencia"]),
    ("resultados", &["eficacia", "efectividad", "evidencia"]),
    ("calidad", &["pureza", "certificacion", "ifos"]),
    ("absorcion", &["biodisponibilidad", "rtg", "asimilacion"]),
    ("vista", &["visual", "ocular", "retina"]),
    ("ojos", &["visual", "ocular", "retina"]),
    ("marca", &["competencia", "laboratorio", "empresa"]),
    ("competencia", &["marca", "comparativa", "alternativa"]),
    ("vender", &["venta", "argumento", "presentar"]),
    ("medico", &["doctor", "especialista", "prescripcion"]),
    ("doctor", &["medico", "especialista", "prescripcion"]),
];

#[derive(Debug, Clone)]
pub struct SynonymTable {
    groups: HashMap<String, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_GROUPS.iter().map(|(k, v)| (*k, v.iter().copied())))
    }
}

impl SynonymTable {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let groups = pairs.into_iter().map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect())).collect();
        Self { groups }
    }

    /// Related terms of `term`, at most `max` of them.
    pub fn related(&self, term: &str, max: usize) -> &[String] {
        match self.groups.get(term) {
            Some(list) => &list[..list.len().min(max)],
            None => &[],
        }
    }

    /// Each token followed by up to `max` of its synonyms. Originals are
    /// always kept and duplicates are allowed.
    pub fn expand(&self, tokens: &[String], max: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            out.push(token.clone());
            out.extend(self.related(token, max).iter().cloned());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

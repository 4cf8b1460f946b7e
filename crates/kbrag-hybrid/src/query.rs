//! Pre-retrieval gate for chat messages: strip the assistant's wake word
//! and recognize messages that carry no domain question at all.

use once_cell::sync::Lazy;
use regex::Regex;

use kbrag_text::normalize::fold;

use crate::routing::compile;

const WAKE_PATTERNS: &[&str] = &[r"(?i)(?:hola|hey|oye|ok|ola)\s*om[ií]a", r"(?i)\bom[ií]a\b"];

const BARE_GREETING: &str =
    r"^(hola|hey|oye|ok|buenas?|buenos?|que tal|como estas?|gracias?|adios|hasta luego)?[.!?,\s]*$";

/// Conversational continuations. These are never vague even without
/// domain vocabulary.
const FOLLOW_UP_PATTERNS: &[&str] = &[
    r"cuentame", r"cuenteme", r"dime\s+mas", r"dame\s+mas", r"amplia", r"profundiza", r"explica", r"explicame",
    r"detalla", r"detallame", r"elabora", r"desarrolla", r"resume", r"resumeme", r"resumi", r"continua", r"sigue",
    r"prosigue", r"mas\s+informacion", r"mas\s+detalles", r"mas\s+sobre", r"que\s+mas", r"algo\s+mas",
    r"otra\s+cosa", r"otra\s+pregunta", r"y\s+sobre", r"tambien", r"ademas", r"aparte", r"igualmente",
    r"por\s+otro\s+lado", r"en\s+cuanto\s+a", r"respecto\s+a", r"sobre\s+eso", r"y\s+eso", r"por\s+que",
    r"como\s+asi", r"a\s+que\s+te\s+refieres", r"no\s+entiendo", r"no\s+entendi", r"repite", r"repetir",
    r"otra\s+vez", r"de\s+nuevo",
];

const DOMAIN_PATTERNS: &[&str] = &[
    // products and substances
    r"omega", r"\bepa\b", r"\bdha\b", r"capsul", r"suplemento", r"aceite", r"pescado", r"\brtg\b", r"etil",
    r"triglicerido", r"natural dha", r"puro epa", r"resolving", r"\bprm\b",
    // clinical
    r"medico", r"doctor", r"paciente", r"prescri", r"dosis", r"posologi", r"indicaci", r"tratamiento", r"clinico",
    r"embaraz", r"cardio", r"gineco", r"neuro", r"pediatr", r"psiquiatr", r"reumat", r"dermato", r"oftalmol",
    r"urolog", r"endocrino", r"gastro", r"neumol", r"oncol", r"geriatr", r"traumat", r"internist",
    r"medicina general",
    // specialties and conditions
    r"especialidad", r"especialista", r"colesterol", r"inflamac", r"cardiovascular", r"diabetes", r"hipertens",
    r"artritis", r"cerebr", r"cognitiv", r"depres", r"ansiedad", r"retina", r"fertil", r"gestacion", r"prenatal",
    r"menopausia",
    // objections
    r"\bcaro\b", r"costoso", r"precio", r"barato", r"coste", r"no funciona", r"no sirve", r"metales pesados",
    r"efecto.? secundario", r"interacci", r"contraindicac", r"otra marca", r"competencia", r"objecion",
    // sales
    r"argumento", r"vender", r"\bventa\b", r"presentar", r"visita", r"represent", r"estrategi", r"perfil",
    r"diferenci", r"ventaja", r"evidencia", r"estudio", r"ensayo",
    // brand
    r"puro omega", r"omega.?3 index", r"\bifos\b", r"certificac",
    // generic product terms
    r"producto", r"composici", r"concentraci", r"biodisponib", r"absorci", r"calidad", r"pureza",
    // domain actions
    r"recomiend", r"recomendar", r"prescrib", r"comparar", r"comparativ", r"que es\b", r"para que sirve",
    r"como funciona", r"como respondo", r"como presento", r"como vendo",
];

static WAKE: Lazy<Vec<Regex>> = Lazy::new(|| compile(WAKE_PATTERNS));
static LEADING_PUNCT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"^[,\s.!?]+"]));
static GREETING: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[BARE_GREETING]));
static FOLLOW_UPS: Lazy<Vec<Regex>> = Lazy::new(|| compile(FOLLOW_UP_PATTERNS));
static DOMAIN: Lazy<Vec<Regex>> = Lazy::new(|| compile(DOMAIN_PATTERNS));

/// Remove the wake word ("Hola Omia" and variants). Returns an empty string
/// when nothing but a bare greeting is left.
pub fn strip_wake_word(message: &str) -> String {
    let mut text = message.trim().to_string();
    for re in WAKE.iter().chain(LEADING_PUNCT.iter()) {
        text = re.replace_all(&text, "").trim().to_string();
    }
    let bare = fold(&text);
    if GREETING.iter().any(|re| re.is_match(bare.trim())) {
        return String::new();
    }
    text
}

/// True when a message contains no domain question: not a follow-up and no
/// domain vocabulary.
pub fn is_greeting_or_vague(message: &str) -> bool {
    let text = fold(message.trim());
    if FOLLOW_UPS.iter().any(|re| re.is_match(&text)) {
        return false;
    }
    !DOMAIN.iter().any(|re| re.is_match(&text))
}

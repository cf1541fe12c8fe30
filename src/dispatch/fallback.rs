//! Static offline fallback.
//!
//! The terminal tier of the dispatch ladder: a deterministic canned
//! answer chosen by keyword matching on the input, produced without any
//! network call. It cannot fail, which is what lets the dispatcher
//! guarantee every call returns text.

/// Coarse symptom categories the canned answers cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    Headache,
    Fever,
    Respiratory,
    Digestive,
    General,
}

const HEADACHE_TERMS: &[&str] = &["headache", "migraine", "head pain", "head ache"];
const FEVER_TERMS: &[&str] = &["fever", "temperature", "hot", "chills", "sweating"];
const RESPIRATORY_TERMS: &[&str] = &["cough", "coughing", "throat", "phlegm", "mucus"];
const DIGESTIVE_TERMS: &[&str] = &[
    "stomach",
    "nausea",
    "vomit",
    "diarrhea",
    "constipation",
    "abdominal",
    "digestive",
    "gut",
];

/// Pick the first matching category, in fixed priority order.
pub(crate) fn categorize(input: &str) -> Category {
    let lower = input.to_lowercase();
    let matches = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if matches(HEADACHE_TERMS) {
        Category::Headache
    } else if matches(FEVER_TERMS) {
        Category::Fever
    } else if matches(RESPIRATORY_TERMS) {
        Category::Respiratory
    } else if matches(DIGESTIVE_TERMS) {
        Category::Digestive
    } else {
        Category::General
    }
}

/// The canned answer for an input. Always succeeds.
pub(crate) fn static_answer(input: &str) -> String {
    let body = match categorize(input) {
        Category::Headache => HEADACHE_ANSWER,
        Category::Fever => FEVER_ANSWER,
        Category::Respiratory => RESPIRATORY_ANSWER,
        Category::Digestive => DIGESTIVE_ANSWER,
        Category::General => GENERAL_ANSWER,
    };
    format!("{DEGRADED_NOTICE}\n\n{body}")
}

const DEGRADED_NOTICE: &str =
    "*Note: the analysis service is temporarily unavailable. The following is general\n\
     pre-written guidance, not a response generated for your specific description.*";

const HEADACHE_ANSWER: &str = "\
## Possible Causes
- **Tension headache** (common): mild to moderate pain, often like a band around the head.
- **Migraine**: throbbing pain, often one-sided, sometimes with nausea or light sensitivity.
- **Dehydration or sinus headache**: less common but worth ruling out.

## Self-Care
- Rest in a quiet, dark room and stay hydrated.
- Over-the-counter pain relief (acetaminophen or ibuprofen) as directed.
- Apply a cold or warm compress to the head or neck.

## When to Seek Care
Seek immediate attention for a sudden severe headache, or one accompanied by fever,
stiff neck, confusion, vision changes, weakness, or difficulty speaking.

*This information is not a substitute for professional medical advice.*";

const FEVER_ANSWER: &str = "\
## Possible Causes
- **Viral infection** (common): cold, flu, or similar illnesses.
- **Bacterial infection**: such as strep throat or a urinary tract infection.
- **COVID-19**: fever is a common symptom.

## Self-Care
- Rest and drink plenty of fluids.
- Acetaminophen or ibuprofen to reduce fever, following dosage instructions.
- Lightweight clothing and a comfortable room temperature.

## When to Seek Care
See a doctor if the fever is above 103\u{b0}F (39.4\u{b0}C), lasts more than 3 days, or comes
with severe headache, stiff neck, difficulty breathing, rash, or persistent vomiting.

*This information is not a substitute for professional medical advice.*";

const RESPIRATORY_ANSWER: &str = "\
## Possible Causes
- **Common cold or flu** (common): cough with sore throat and congestion.
- **Bronchitis**: persistent cough with phlegm.
- **Allergies or irritants**: dry cough, often seasonal.

## Self-Care
- Stay hydrated; warm liquids can soothe the throat.
- Honey (for adults and children over one year) and throat lozenges.
- Humidify the air and avoid smoke and other irritants.

## When to Seek Care
See a doctor for a cough lasting more than 3 weeks, shortness of breath, chest pain,
coughing up blood, or high fever.

*This information is not a substitute for professional medical advice.*";

const DIGESTIVE_ANSWER: &str = "\
## Possible Causes
- **Gastroenteritis** (common): viral or bacterial stomach upset.
- **Food intolerance or indigestion**: symptoms tied to meals.
- **Irritable bowel**: recurring cramping with changed bowel habits.

## Self-Care
- Small sips of clear fluids; rehydration solutions if vomiting or diarrhea persist.
- Bland foods (bananas, rice, toast) once you can keep food down.
- Avoid dairy, caffeine, alcohol, and fatty foods until recovered.

## When to Seek Care
Seek care for severe or persistent abdominal pain, signs of dehydration, blood in stool
or vomit, or symptoms lasting more than a few days.

*This information is not a substitute for professional medical advice.*";

const GENERAL_ANSWER: &str = "\
## General Guidance
Your description could not be matched to a specific category, and a tailored analysis
is not available right now.

## Self-Care
- Rest, stay hydrated, and monitor how your symptoms develop.
- Note when symptoms started, what makes them better or worse, and any other changes.

## When to Seek Care
See a healthcare provider if symptoms are severe, worsening, or persist beyond a few
days. Seek emergency care for chest pain, difficulty breathing, sudden confusion, or
uncontrolled bleeding.

*This information is not a substitute for professional medical advice.*";

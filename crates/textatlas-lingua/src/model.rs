//! Language model: stopword set, known vocabulary, and lemmatizer.
//!
//! A [`LanguageModel`] is the process-wide analysis resource. It is loaded
//! once (by registered name or from lexicon files) and shared via `Arc`
//! across every analyzer that needs it.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::info;

use textatlas_core::error::{AtlasError, Result};

/// Stopwords for the built-in English lexicon, one word per whitespace-
/// separated entry. Contractions are listed in their apostrophe form because
/// the tokenizer keeps them as single tokens.
const ENGLISH_STOPWORDS: &str = "
a about above after again against all am an and any are aren't as at be
because been before being below between both but by can't cannot could
couldn't did didn't do does doesn't doing don't down during each few for from
further had hadn't has hasn't have haven't having he he'd he'll he's her here
here's hers herself him himself his how how's i i'd i'll i'm i've if in into
is isn't it it's its itself let's me more most mustn't my myself no nor not of
off on once only or other ought our ours ourselves out over own same shan't
she she'd she'll she's should shouldn't so some such than that that's the
their theirs them themselves then there there's these they they'd they'll
they're they've this those through to too under until up very was wasn't we
we'd we'll we're we've were weren't what what's when when's where where's
which while who who's whom why why's with won't would wouldn't you you'd
you'll you're you've your yours yourself yourselves
";

/// Known lemmas for the built-in English lexicon. Tokens whose lemma is not
/// in this set count as out-of-vocabulary.
const ENGLISH_VOCABULARY: &str = "
ability able account across act action activity actual add address age agency
agent ago agree air allow alone along already also always amount analysis
animal another answer anyone anything appear apple apply approach area argue
arm arrive art article artist ask assume attack attention author authority
available avoid away baby back bad bag ball bank bar bark base battle beat
beautiful become bed begin behavior believe benefit best better big bill
billion bird bit black blood blue board boat body book born box boy brain
break bring brother brown budget build building business buy call camera
campaign cancer candidate capital car card care career carry case cat catch
cause cell center central century certain chair challenge chance change
character charge check child choice choose church citizen city claim class
clear close coach cold collection college color come common community company
compare computer concern condition conference consider consumer contain
continue control cost country couple course court cover create crime culture
cup current customer cut dark data daughter day dead deal death debate decade
decide decision deep defense degree democratic describe design despite detail
determine develop development die difference different difficult dinner
direction director discover discuss discussion disease doctor dog door draw
dream drink drive drop drug dry early east easy eat economic economy edge
education effect effort eight either election else employee end energy enjoy
enough enter entire environment especially establish even evening event ever
every everybody everyone everything evidence exactly example executive exist
expect experience expert explain eye face fact factor fail fall family far
fast father fear federal feel feeling field fight figure fill film final
finally financial find fine finger finish fire firm first fish five floor fly
focus follow food foot force foreign forget form former forward four fox free
friend front full fund future game garden gas general generation girl give
glass go goal good government great green ground group grow growth guess gun
guy hair half hand hang happen happy hard head health hear heart heat heavy
help high history hit hold home hope hospital hot hotel hour house however
huge human hundred husband idea identify image imagine impact important
improve include increase indeed indicate individual industry information
inside instead institution interest interesting international interview
investment involve issue item job join jump just keep key kid kill kind
kitchen know knowledge land language large last late later laugh law lawyer
lay lazy lead leader learn least leave left leg legal less letter level lie
life light like likely line list listen little live local long look lose loss
lot love low machine magazine main maintain major majority make man manage
management manager many market marriage material matter may maybe mean measure
media medical meet meeting member memory mention message method middle might
military million mind minute miss mission model modern moment money month moon
morning mother mouth move movement movie much music must name nation national
natural nature near nearly necessary need network never new news newspaper
next nice night nine north note nothing notice now number occur offer office
officer official often oil old one open operation opportunity option order
organization outside owner page pain painting paper parent part particular
particularly partner party pass past patient pattern pay peace people per
perform performance perhaps period person personal phone physical pick picture
piece place plan plant play player point police policy political politics poor
popular population position positive possible power practice prepare present
president pressure pretty prevent price private probably problem process
produce product production professional professor program project property
protect prove provide public pull purpose push put quality question quick
quickly quiet quite race radio raise range rate rather reach read ready real
reality realize really reason receive recent recently recognize record red
reduce reflect region relate relationship religious remain remember remove
report represent require research resource respond response rest result
return reveal rich ride right rise risk road rock role room rule run sad safe
save say scene school science scientist score sea season seat second section
security see seek seem sell send senior sense series serious serve service
set seven several shake share shoot short shot shoulder show side sign
significant similar simple simply since sing single sister sit site situation
six size skill skin small smart smile social society soldier somebody someone
something sometimes son song soon sort sound source south space speak special
specific speech spend sport spring staff stage stand standard star start state
statement station stay step still stock stop store story strategy street
strong structure student study stuff style subject success successful suddenly
suffer suggest summer support sure surface system table take talk task tax
teach teacher team technology television tell ten tend term test text thank
theory thing think third thousand threat three throw thus time today together
tonight top total tough toward town trade traditional training travel treat
treatment tree trial trip trouble true truth try turn two type understand
unit upon use usual usually value various victim view violence visit voice
vote wait walk wall want war watch water way weapon wear week weight well
west western whatever whether white whole whose wide wife will win wind
window wish within without woman wonder word work worker world worry write
writer wrong yard yeah year yes yet young
";

/// Irregular `form -> lemma` pairs the suffix rules cannot derive.
const ENGLISH_LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("ate", "eat"),
    ("became", "become"),
    ("began", "begin"),
    ("begun", "begin"),
    ("best", "good"),
    ("better", "good"),
    ("bought", "buy"),
    ("broke", "break"),
    ("broken", "break"),
    ("brought", "bring"),
    ("built", "build"),
    ("came", "come"),
    ("caught", "catch"),
    ("children", "child"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("eaten", "eat"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("feet", "foot"),
    ("felt", "feel"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("gone", "go"),
    ("got", "get"),
    ("gotten", "get"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("heard", "hear"),
    ("held", "hold"),
    ("kept", "keep"),
    ("knew", "know"),
    ("known", "know"),
    ("led", "lead"),
    ("lost", "lose"),
    ("made", "make"),
    ("meant", "mean"),
    ("men", "man"),
    ("met", "meet"),
    ("mice", "mouse"),
    ("paid", "pay"),
    ("people", "person"),
    ("ran", "run"),
    ("rode", "ride"),
    ("rose", "rise"),
    ("said", "say"),
    ("sang", "sing"),
    ("sat", "sit"),
    ("saw", "see"),
    ("seen", "see"),
    ("sent", "send"),
    ("sold", "sell"),
    ("spent", "spend"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("stood", "stand"),
    ("sung", "sing"),
    ("taken", "take"),
    ("taught", "teach"),
    ("teeth", "tooth"),
    ("thought", "think"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("told", "tell"),
    ("took", "take"),
    ("went", "go"),
    ("women", "woman"),
    ("won", "win"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("wrote", "write"),
];

/// Suffix rewrite rules tried in order. A rule only fires when the rewritten
/// form is in the vocabulary, so unknown words keep their surface form.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("iest", "y"),
    ("ies", "y"),
    ("ied", "y"),
    ("ier", "y"),
    ("ves", "f"),
    ("ves", "fe"),
    ("ing", ""),
    ("ing", "e"),
    ("ed", ""),
    ("ed", "e"),
    ("est", ""),
    ("er", ""),
    ("es", ""),
    ("s", ""),
];

/// Lexical resources for one language: stopwords, known vocabulary, and a
/// lemmatizer (exception table plus suffix rules).
///
/// Load once with [`LanguageModel::load`] or from lexicon files, wrap in an
/// `Arc`, and hand it to every analyzer.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    name: String,
    stopwords: HashSet<String>,
    vocabulary: HashSet<String>,
    lemma_exceptions: HashMap<String, String>,
}

impl LanguageModel {
    /// Resolve a registered model by name.
    ///
    /// The built-in English lexicon is registered as `"english-small"`.
    /// Unknown names fail with [`AtlasError::ModelLoad`]; construction never
    /// proceeds with an empty backend.
    pub fn load(name: &str) -> Result<Self> {
        match name {
            "english-small" => {
                let model = Self::builtin_english();
                info!(
                    model = %model.name,
                    stopwords = model.stopwords.len(),
                    vocabulary = model.vocabulary.len(),
                    "Language model loaded"
                );
                Ok(model)
            }
            other => Err(AtlasError::ModelLoad(format!(
                "unknown language model '{}'; available models: english-small",
                other
            ))),
        }
    }

    /// Load a custom lexicon from a directory.
    ///
    /// The directory must contain `stopwords.txt`, `vocabulary.txt` (one word
    /// per line, `#` comments allowed), and `lemmas.tsv` (tab-separated
    /// `form<TAB>lemma` pairs).
    pub fn from_directory(dir: &Path) -> Result<Self> {
        Self::from_files(
            &dir.join("stopwords.txt"),
            &dir.join("vocabulary.txt"),
            &dir.join("lemmas.tsv"),
        )
    }

    /// Load a custom lexicon from explicit file paths.
    pub fn from_files(
        stopwords_path: &Path,
        vocabulary_path: &Path,
        lemmas_path: &Path,
    ) -> Result<Self> {
        if !stopwords_path.exists() {
            return Err(AtlasError::ModelLoad(format!(
                "stopword list not found at {}",
                stopwords_path.display()
            )));
        }
        if !vocabulary_path.exists() {
            return Err(AtlasError::ModelLoad(format!(
                "vocabulary list not found at {}",
                vocabulary_path.display()
            )));
        }
        if !lemmas_path.exists() {
            return Err(AtlasError::ModelLoad(format!(
                "lemma table not found at {}",
                lemmas_path.display()
            )));
        }

        let stopwords = read_word_list(stopwords_path)?;
        let vocabulary = read_word_list(vocabulary_path)?;
        let lemma_exceptions = read_lemma_table(lemmas_path)?;

        let model = Self {
            name: "custom".to_string(),
            stopwords,
            vocabulary,
            lemma_exceptions,
        };
        info!(
            model = %model.name,
            stopwords = model.stopwords.len(),
            vocabulary = model.vocabulary.len(),
            lemmas = model.lemma_exceptions.len(),
            "Language model loaded from files"
        );
        Ok(model)
    }

    fn builtin_english() -> Self {
        Self {
            name: "english-small".to_string(),
            stopwords: ENGLISH_STOPWORDS
                .split_ascii_whitespace()
                .map(str::to_string)
                .collect(),
            vocabulary: ENGLISH_VOCABULARY
                .split_ascii_whitespace()
                .map(str::to_string)
                .collect(),
            lemma_exceptions: ENGLISH_LEMMA_EXCEPTIONS
                .iter()
                .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
                .collect(),
        }
    }

    /// The registered name of this model.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Whether the given lemma is a known word.
    pub fn in_vocabulary(&self, lemma: &str) -> bool {
        self.vocabulary.contains(&lemma.to_lowercase())
    }

    /// Reduce a word to its dictionary base form.
    ///
    /// Lookup order: exception table, then suffix rules (a rule fires only
    /// when the rewritten form is a known vocabulary word, with a doubled
    /// final consonant collapsed for forms like "running"). Falls back to the
    /// lowercased input, so an unknown word is its own lemma.
    pub fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.lemma_exceptions.get(&lower) {
            return lemma.clone();
        }
        if self.vocabulary.contains(&lower) {
            return lower;
        }
        for (suffix, tail) in SUFFIX_RULES {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            if stem.len() < 2 {
                continue;
            }
            let candidate = format!("{}{}", stem, tail);
            if self.vocabulary.contains(&candidate) {
                return candidate;
            }
            if tail.is_empty() {
                let mut rev = stem.chars().rev();
                if let (Some(last), Some(prev)) = (rev.next(), rev.next()) {
                    if last == prev && last.is_ascii_alphabetic() {
                        let undoubled = &stem[..stem.len() - last.len_utf8()];
                        if self.vocabulary.contains(undoubled) {
                            return undoubled.to_string();
                        }
                    }
                }
            }
        }
        lower
    }
}

fn read_word_list(path: &Path) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_lowercase())
        .collect())
}

fn read_lemma_table(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    let mut table = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((form, lemma)) = line.split_once('\t') else {
            return Err(AtlasError::ModelLoad(format!(
                "malformed lemma entry at {}:{}: expected form<TAB>lemma",
                path.display(),
                idx + 1
            )));
        };
        table.insert(form.trim().to_lowercase(), lemma.trim().to_lowercase());
    }
    Ok(table)
}

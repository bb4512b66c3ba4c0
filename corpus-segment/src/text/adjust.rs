//! Resolution of reviewer correction annotations.
//!
//! A reviewer marks tokenization mistakes inline in the review buffer. Four
//! ordered passes rewrite the annotations into plain corrected text and
//! collect the lexicon changes they imply:
//!
//! 1. `(A {B+ C}` or `(A {B/ C}`: re-split, B belongs with C. Output `A BC`.
//! 2. `{A (B} C+` or `{A (B} C/`: re-split, B belongs with A. Output `AB C`.
//! 3. `(T1 T2 ... Tn+`: merge the tokens into one word (`/` flags them instead).
//! 4. `W+` or `W/`: add or remove a single word.
//!
//! In the split forms the operator decides the fate of the discarded pairing,
//! while the chosen pairing is always added. Passes run in this order on the
//! same string; text that matches no pattern is left untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((.+?) \{(.+?)([/+]) (.+?)\}").expect("prefix split pattern is valid")
});

static SUFFIX_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(.+?) \((.+?)\} (.+?)([/+])").expect("suffix split pattern is valid")
});

static GROUPED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(((?:\S+ )+?\S+)([+/])").expect("grouped correction pattern is valid")
});

static BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+)([+/])").expect("bare correction pattern is valid"));

/// Lexicon operation requested by an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconOp {
    Add,
    Remove,
}

impl LexiconOp {
    /// `+` adds, `/` removes.
    fn from_operator(op: &str) -> Self {
        if op == "+" { Self::Add } else { Self::Remove }
    }
}

/// One word flagged for addition to or removal from the lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentRecord {
    pub word: String,
    pub op: LexiconOp,
}

impl AdjustmentRecord {
    pub fn new(word: impl Into<String>, op: LexiconOp) -> Self {
        Self {
            word: word.into(),
            op,
        }
    }

    pub fn add(word: impl Into<String>) -> Self {
        Self::new(word, LexiconOp::Add)
    }

    pub fn remove(word: impl Into<String>) -> Self {
        Self::new(word, LexiconOp::Remove)
    }
}

/// Output of a single pass: rewritten text plus the records it extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    pub text: String,
    pub records: Vec<AdjustmentRecord>,
}

/// A rewriting pass over the review text.
pub type Pass = fn(&str, char) -> PassOutput;

/// The passes in the order they must run.
pub const PASSES: [(&str, Pass); 4] = [
    ("prefix split", resolve_prefix_splits),
    ("suffix split", resolve_suffix_splits),
    ("grouped correction", resolve_grouped_corrections),
    ("bare correction", resolve_bare_corrections),
];

/// Corrected text together with the lexicon changes, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjusted {
    pub text: String,
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl Adjusted {
    fn absorb(&mut self, records: Vec<AdjustmentRecord>) {
        for record in records {
            match record.op {
                LexiconOp::Add => self.to_add.push(record.word),
                LexiconOp::Remove => self.to_remove.push(record.word),
            }
        }
    }
}

/// Pass 1: `(A {B<op> C}` becomes `A BC`.
pub fn resolve_prefix_splits(text: &str, _marker: char) -> PassOutput {
    let mut rewritten = text.to_string();
    let mut records = Vec::new();

    for caps in PREFIX_SPLIT.captures_iter(text) {
        let (a, b, op, c) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        records.push(AdjustmentRecord::new(
            format!("{a}{b}"),
            LexiconOp::from_operator(op),
        ));
        records.push(AdjustmentRecord::add(format!("{b}{c}")));
        rewritten = rewritten.replace(&caps[0], &format!("{a} {b}{c}"));
    }

    PassOutput {
        text: rewritten,
        records,
    }
}

/// Pass 2: `{A (B} C<op>` becomes `AB C`.
pub fn resolve_suffix_splits(text: &str, _marker: char) -> PassOutput {
    let mut rewritten = text.to_string();
    let mut records = Vec::new();

    for caps in SUFFIX_SPLIT.captures_iter(text) {
        let (a, b, c, op) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        records.push(AdjustmentRecord::new(
            format!("{b}{c}"),
            LexiconOp::from_operator(op),
        ));
        records.push(AdjustmentRecord::add(format!("{a}{b}")));
        rewritten = rewritten.replace(&caps[0], &format!("{a}{b} {c}"));
    }

    PassOutput {
        text: rewritten,
        records,
    }
}

/// Pass 3: `(T1 T2 ... Tn<op>` becomes the merged word (or the flagged tokens).
pub fn resolve_grouped_corrections(text: &str, marker: char) -> PassOutput {
    resolve_corrections(&GROUPED, text, marker)
}

/// Pass 4: `W<op>` becomes `W` terminated by the marker.
pub fn resolve_bare_corrections(text: &str, marker: char) -> PassOutput {
    resolve_corrections(&BARE, text, marker)
}

fn resolve_corrections(pattern: &Regex, text: &str, marker: char) -> PassOutput {
    let mut rewritten = text.to_string();
    let mut records = Vec::new();

    for caps in pattern.captures_iter(text) {
        let (replacement, record) = correct(&caps[1], LexiconOp::from_operator(&caps[2]), marker);
        records.push(record);
        rewritten = rewritten.replace(&caps[0], &replacement);
    }

    PassOutput {
        text: rewritten,
        records,
    }
}

/// Resolve one correction into its replacement text and lexicon record.
///
/// Additions drop affix continuations (`<marker> -`), strip hyphens for the
/// record and collapse spaces in the replacement. Removals only strip hyphens
/// for the record and keep the replacement's spacing.
fn correct(text: &str, op: LexiconOp, marker: char) -> (String, AdjustmentRecord) {
    let mut text = text.to_string();

    let record = match op {
        LexiconOp::Add => {
            if text.contains('-') {
                text = text.replace(&format!("{marker} -"), "");
            }
            let record = AdjustmentRecord::add(text.replace('-', ""));
            text = text.replace(' ', "");
            record
        }
        LexiconOp::Remove => AdjustmentRecord::remove(text.replace('-', "")),
    };

    if !text.ends_with(marker) {
        text.push(marker);
    }
    (text, record)
}

/// Runs the ordered passes for a corpus.
#[derive(Debug, Clone, Copy)]
pub struct AdjustmentRules {
    marker: char,
}

impl AdjustmentRules {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    /// Resolve every annotation in a reviewed chunk.
    pub fn apply(&self, reviewed: &str) -> Adjusted {
        let mut adjusted = Adjusted {
            text: reviewed.to_string(),
            ..Adjusted::default()
        };

        for (name, pass) in PASSES {
            let output = pass(&adjusted.text, self.marker);
            if !output.records.is_empty() {
                log::debug!("{}: {} annotations resolved", name, output.records.len());
            }
            adjusted.text = output.text;
            adjusted.absorb(output.records);
        }

        adjusted
    }
}

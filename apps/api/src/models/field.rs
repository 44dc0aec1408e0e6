//! The eight fixed resume fields, in the order they are asked.

use serde::{Deserialize, Serialize};

/// Number of fields in a complete resume draft.
pub const FIELD_COUNT: usize = 8;

/// One of the eight resume slots. The declaration order is the question order
/// and the positional index used everywhere a draft is an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Name,
    Profession,
    Education,
    Skills,
    Experience,
    Certifications,
    Address,
    Contact,
}

/// How an accepted value is normalised before it is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    Trim,
    /// Collapse to the phone digit run found in the value.
    PhoneDigits,
}

impl FieldType {
    pub const ALL: [FieldType; FIELD_COUNT] = [
        FieldType::Name,
        FieldType::Profession,
        FieldType::Education,
        FieldType::Skills,
        FieldType::Experience,
        FieldType::Certifications,
        FieldType::Address,
        FieldType::Contact,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn token(self) -> &'static str {
        match self {
            FieldType::Name => "name",
            FieldType::Profession => "profession",
            FieldType::Education => "education",
            FieldType::Skills => "skills",
            FieldType::Experience => "experience",
            FieldType::Certifications => "certifications",
            FieldType::Address => "address",
            FieldType::Contact => "contact",
        }
    }

    /// Exact, case-insensitive match on the wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.token().eq_ignore_ascii_case(token))
    }

    /// Compatibility shim for callers that send an untyped prompt (for example the
    /// question text itself) instead of a field token. Matches English and Urdu
    /// keywords; the first field with a hit wins.
    pub fn sniff(prompt: &str) -> Option<Self> {
        let lowered = prompt.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.keywords().iter().any(|k| lowered.contains(k)))
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            FieldType::Name => &["name", "نام"],
            FieldType::Profession => &["profession", "occupation", "job", "پیشہ"],
            FieldType::Education => &["education", "degree", "تعلیم"],
            FieldType::Skills => &["skill", "مہارت"],
            FieldType::Experience => &["experience", "تجربہ"],
            FieldType::Certifications => &["certific", "سرٹیفیکیشن"],
            FieldType::Address => &["address", "city", "پتہ", "شہر"],
            FieldType::Contact => &["phone", "contact", "mobile", "فون", "نمبر"],
        }
    }

    /// The question read aloud to the user.
    pub fn prompt(self) -> &'static str {
        match self {
            FieldType::Name => "آپ کا نام کیا ہے؟",
            FieldType::Profession => "آپ کا پیشہ کیا ہے؟",
            FieldType::Education => "آپ کی تعلیم کیا ہے اور کب مکمل ہوئی؟",
            FieldType::Skills => "آپ کے پاس کون سی مہارتیں ہیں؟ تفصیل سے بتائیں۔",
            FieldType::Experience => "آپ کا تجربہ کہاں کہاں رہا ہے؟ تفصیل سے بتائیں۔",
            FieldType::Certifications => "آپ کے پاس کوئی سرٹیفیکیشنز ہیں؟",
            FieldType::Address => "آپ کا پتہ کیا ہے؟ شہر کے ساتھ بتائیں۔",
            FieldType::Contact => "آپ کا فون نمبر کیا ہے؟",
        }
    }

    /// Instruction given to the oracle describing what a valid answer looks like
    /// and what to extract from it.
    pub fn task(self) -> &'static str {
        match self {
            FieldType::Name => {
                "Decide whether the answer contains a person's name. \
                 Extract only the full name, without filler words such as 'my name is'."
            }
            FieldType::Profession => {
                "Decide whether the answer names a profession, trade, or job title. \
                 Extract only the profession in a few words."
            }
            FieldType::Education => {
                "Decide whether the answer describes an education level, school, degree, or \
                 completion year. Saying there is no formal education is also valid. \
                 Extract the education details concisely."
            }
            FieldType::Skills => {
                "Decide whether the answer lists one or more practical skills. \
                 Extract the skills as a comma-separated list."
            }
            FieldType::Experience => {
                "Decide whether the answer describes work experience: places, employers, \
                 duration, or kinds of work done. Extract a concise description of the experience."
            }
            FieldType::Certifications => {
                "Decide whether the answer mentions certifications or courses, or clearly states \
                 there are none. Extract the certification names, or 'None' if there are none."
            }
            FieldType::Address => {
                "Decide whether the answer contains an address or at least a city. \
                 Extract the address including the city."
            }
            FieldType::Contact => {
                "Decide whether the answer contains a phone number. Numbers may be spoken \
                 digit by digit or in Urdu words. Extract the phone number as digits only."
            }
        }
    }

    pub fn post_process(self) -> PostProcess {
        match self {
            FieldType::Contact => PostProcess::PhoneDigits,
            _ => PostProcess::Trim,
        }
    }
}

/// Task used when the caller's field type is not one of the eight.
pub const GENERIC_TASK: &str = "Decide whether the answer is a meaningful response to a \
    resume question. Extract the relevant information from it.";

// User-facing validation messages. Shown and read aloud in Urdu.

pub const ANSWER_VALID: &str = "جواب درست ہے";
pub const ANSWER_INVALID: &str = "جواب واضح نہیں ہے، براہ کرم دوبارہ بتائیں";
pub const ANSWER_EMPTY: &str = "جواب خالی ہے";
pub const PHONE_VALID: &str = "فون نمبر درست ہے";
pub const PHONE_INVALID: &str = "فون نمبر درست نہیں ہے";
pub const ANSWER_UNVERIFIED: &str = "جواب کی تصدیق میں مسئلہ ہوا ہے";

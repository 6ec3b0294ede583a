//! Splitting a text body into provider-sized parts.
//!
//! Counting follows the GSM 03.38 rules carriers apply:
//!
//! | Encoding | Single part | Each part of a multipart message |
//! |---|---|---|
//! | GSM-7 | 160 septets | 153 septets |
//! | UCS-2 | 70 code units | 67 code units |
//!
//! Extension-table characters (`€`, `[`, `{`, ...) take two septets. One
//! character outside the GSM alphabet switches the whole body to UCS-2.
//! Parts never split a character, so escape pairs and surrogate pairs stay
//! together.

use sos_domain::config::SmsConfig;

const GSM_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";
const GSM_EXTENSION: &str = "\u{c}^{}\\[~]|€";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gsm7,
    Ucs2,
}

impl Encoding {
    #[must_use]
    pub fn detect(body: &str) -> Self {
        if body.chars().all(|c| GSM_BASIC.contains(c) || GSM_EXTENSION.contains(c)) {
            Self::Gsm7
        } else {
            Self::Ucs2
        }
    }

    /// Size of one character in this encoding's units.
    fn cost(self, c: char) -> usize {
        match self {
            Self::Gsm7 if GSM_EXTENSION.contains(c) => 2,
            Self::Gsm7 => 1,
            Self::Ucs2 => c.len_utf16(),
        }
    }

    const fn limits(self, sms: &SmsConfig) -> (usize, usize) {
        match self {
            Self::Gsm7 => (sms.single_segment_gsm, sms.multipart_segment_gsm),
            Self::Ucs2 => (sms.single_segment_ucs2, sms.multipart_segment_ucs2),
        }
    }
}

/// Length of `body` in units of its own encoding.
#[must_use]
pub fn encoded_len(body: &str) -> usize {
    let encoding = Encoding::detect(body);
    body.chars().map(|c| encoding.cost(c)).sum()
}

/// Splits `body` into parts that each fit one segment.
///
/// Always returns at least one part (an empty body gives one empty part) and
/// the parts concatenate back to `body`.
#[must_use]
pub fn segment_message(body: &str, sms: &SmsConfig) -> Vec<String> {
    let encoding = Encoding::detect(body);
    let (single, multipart) = encoding.limits(sms);

    if encoded_len(body) <= single {
        return vec![body.to_owned()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in body.chars() {
        let cost = encoding.cost(c);
        if used + cost > multipart && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += cost;
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

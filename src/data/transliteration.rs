//! ASCII replacements for the non-ASCII letters that show up in headings.
//!
//! German umlauts and `ß` expand to their conventional spellings; IAST and
//! other Latin diacritics fall back to the base letter.

use phf::phf_map;

pub static TRANSLITERATION: phf::Map<char, &'static str> = phf_map! {
    // German
    'Ä' => "Ae", 'ä' => "ae",
    'Ö' => "Oe", 'ö' => "oe",
    'Ü' => "Ue", 'ü' => "ue",
    'ß' => "ss", 'ẞ' => "SS",

    // IAST
    'Ā' => "A", 'ā' => "a",
    'Ī' => "I", 'ī' => "i",
    'Ū' => "U", 'ū' => "u",
    'Ṛ' => "R", 'ṛ' => "r",
    'Ṝ' => "R", 'ṝ' => "r",
    'Ḷ' => "L", 'ḷ' => "l",
    'Ḹ' => "L", 'ḹ' => "l",
    'Ṅ' => "N", 'ṅ' => "n",
    'Ñ' => "N", 'ñ' => "n",
    'Ṭ' => "T", 'ṭ' => "t",
    'Ḍ' => "D", 'ḍ' => "d",
    'Ṇ' => "N", 'ṇ' => "n",
    'Ś' => "S", 'ś' => "s",
    'Ṣ' => "S", 'ṣ' => "s",
    'Ṃ' => "M", 'ṃ' => "m",
    'Ṁ' => "M", 'ṁ' => "m",
    'Ḥ' => "H", 'ḥ' => "h",

    // Latin-1 and common Latin Extended-A
    'À' => "A", 'Á' => "A", 'Â' => "A", 'Ã' => "A", 'Å' => "A", 'Æ' => "AE",
    'à' => "a", 'á' => "a", 'â' => "a", 'ã' => "a", 'å' => "a", 'æ' => "ae",
    'Ç' => "C", 'ç' => "c", 'Č' => "C", 'č' => "c", 'Ć' => "C", 'ć' => "c",
    'È' => "E", 'É' => "E", 'Ê' => "E", 'Ë' => "E", 'Ē' => "E", 'Ě' => "E",
    'è' => "e", 'é' => "e", 'ê' => "e", 'ë' => "e", 'ē' => "e", 'ě' => "e",
    'Ì' => "I", 'Í' => "I", 'Î' => "I", 'Ï' => "I",
    'ì' => "i", 'í' => "i", 'î' => "i", 'ï' => "i",
    'Ð' => "D", 'ð' => "d",
    'Ò' => "O", 'Ó' => "O", 'Ô' => "O", 'Õ' => "O", 'Ø' => "O", 'Ō' => "O", 'Œ' => "OE",
    'ò' => "o", 'ó' => "o", 'ô' => "o", 'õ' => "o", 'ø' => "o", 'ō' => "o", 'œ' => "oe",
    'Ù' => "U", 'Ú' => "U", 'Û' => "U",
    'ù' => "u", 'ú' => "u", 'û' => "u",
    'Ý' => "Y", 'ý' => "y", 'ÿ' => "y",
    'Þ' => "Th", 'þ' => "th",
    'Ł' => "L", 'ł' => "l",
    'Ń' => "N", 'ń' => "n", 'Ň' => "N", 'ň' => "n",
    'Ř' => "R", 'ř' => "r",
    'Š' => "S", 'š' => "s",
    'Ž' => "Z", 'ž' => "z", 'Ż' => "Z", 'ż' => "z", 'Ź' => "Z", 'ź' => "z",
};

//! Lingvanex language codes.
//!
//! The service identifies languages by a "full code" such as `en_US` or
//! `zh-Hans_CN`. Callers may also pass the two-letter alpha-1 code or the
//! English name; [`normalize_lang`] maps all three forms to a full code.

pub const AUTO: &str = "auto";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    pub full_code: &'static str,
    pub alpha1: &'static str,
    pub name: &'static str,
}

const fn lang(full_code: &'static str, alpha1: &'static str, name: &'static str) -> Language {
    Language {
        full_code,
        alpha1,
        name,
    }
}

// The first entry for an alpha-1 code is the one it resolves to.
pub const LANGUAGES: &[Language] = &[
    lang("af_ZA", "af", "afrikaans"),
    lang("sq_AL", "sq", "albanian"),
    lang("am_ET", "am", "amharic"),
    lang("ar_SA", "ar", "arabic"),
    lang("hy_AM", "hy", "armenian"),
    lang("az_AZ", "az", "azerbaijani"),
    lang("eu_ES", "eu", "basque"),
    lang("be_BY", "be", "belarusian"),
    lang("bn_BD", "bn", "bengali"),
    lang("bs_BA", "bs", "bosnian"),
    lang("bg_BG", "bg", "bulgarian"),
    lang("ca_ES", "ca", "catalan"),
    lang("ceb_PH", "ceb", "cebuano"),
    lang("zh-Hans_CN", "zh", "chinese (simplified)"),
    lang("zh-Hant_TW", "zh", "chinese (traditional)"),
    lang("co_FR", "co", "corsican"),
    lang("hr_HR", "hr", "croatian"),
    lang("cs_CZ", "cs", "czech"),
    lang("da_DK", "da", "danish"),
    lang("nl_NL", "nl", "dutch"),
    lang("en_US", "en", "english"),
    lang("en_GB", "en", "english (united kingdom)"),
    lang("eo_WORLD", "eo", "esperanto"),
    lang("et_EE", "et", "estonian"),
    lang("fi_FI", "fi", "finnish"),
    lang("fr_FR", "fr", "french"),
    lang("fr_CA", "fr", "french (canada)"),
    lang("fy_NL", "fy", "frisian"),
    lang("gl_ES", "gl", "galician"),
    lang("ka_GE", "ka", "georgian"),
    lang("de_DE", "de", "german"),
    lang("el_GR", "el", "greek"),
    lang("gu_IN", "gu", "gujarati"),
    lang("ht_HT", "ht", "haitian creole"),
    lang("ha_NE", "ha", "hausa"),
    lang("haw_US", "haw", "hawaiian"),
    lang("he_IL", "he", "hebrew"),
    lang("hi_IN", "hi", "hindi"),
    lang("hmn_CN", "hmn", "hmong"),
    lang("hu_HU", "hu", "hungarian"),
    lang("is_IS", "is", "icelandic"),
    lang("ig_NG", "ig", "igbo"),
    lang("id_ID", "id", "indonesian"),
    lang("ga_IE", "ga", "irish"),
    lang("it_IT", "it", "italian"),
    lang("ja_JP", "ja", "japanese"),
    lang("jv_ID", "jv", "javanese"),
    lang("kn_IN", "kn", "kannada"),
    lang("kk_KZ", "kk", "kazakh"),
    lang("km_KH", "km", "khmer"),
    lang("rw_RW", "rw", "kinyarwanda"),
    lang("ko_KR", "ko", "korean"),
    lang("ku_IR", "ku", "kurdish"),
    lang("ky_KG", "ky", "kyrgyz"),
    lang("lo_LA", "lo", "lao"),
    lang("la_VAT", "la", "latin"),
    lang("lv_LV", "lv", "latvian"),
    lang("lt_LT", "lt", "lithuanian"),
    lang("lb_LU", "lb", "luxembourgish"),
    lang("mk_MK", "mk", "macedonian"),
    lang("mg_MG", "mg", "malagasy"),
    lang("ms_MY", "ms", "malay"),
    lang("ml_IN", "ml", "malayalam"),
    lang("mt_MT", "mt", "maltese"),
    lang("mi_NZ", "mi", "maori"),
    lang("mr_IN", "mr", "marathi"),
    lang("mn_MN", "mn", "mongolian"),
    lang("my_MM", "my", "myanmar (burmese)"),
    lang("ne_NP", "ne", "nepali"),
    lang("no_NO", "no", "norwegian"),
    lang("ny_MW", "ny", "nyanja (chichewa)"),
    lang("or_OR", "or", "odia"),
    lang("ps_AF", "ps", "pashto"),
    lang("fa_IR", "fa", "persian"),
    lang("pl_PL", "pl", "polish"),
    lang("pt_PT", "pt", "portuguese"),
    lang("pt_BR", "pt", "portuguese (brazil)"),
    lang("pa_PK", "pa", "punjabi"),
    lang("ro_RO", "ro", "romanian"),
    lang("ru_RU", "ru", "russian"),
    lang("sm_WS", "sm", "samoan"),
    lang("gd_GB", "gd", "scots gaelic"),
    lang("sr-Cyrl_RS", "sr", "serbian"),
    lang("st_LS", "st", "sesotho"),
    lang("sn_ZW", "sn", "shona"),
    lang("sd_PK", "sd", "sindhi"),
    lang("si_LK", "si", "sinhala"),
    lang("sk_SK", "sk", "slovak"),
    lang("sl_SI", "sl", "slovenian"),
    lang("so_SO", "so", "somali"),
    lang("es_ES", "es", "spanish"),
    lang("es_MX", "es", "spanish (mexico)"),
    lang("su_ID", "su", "sundanese"),
    lang("sw_TZ", "sw", "swahili"),
    lang("sv_SE", "sv", "swedish"),
    lang("tl_PH", "tl", "tagalog"),
    lang("tg_TJ", "tg", "tajik"),
    lang("ta_IN", "ta", "tamil"),
    lang("tt_TT", "tt", "tatar"),
    lang("te_IN", "te", "telugu"),
    lang("th_TH", "th", "thai"),
    lang("tr_TR", "tr", "turkish"),
    lang("tk_TK", "tk", "turkmen"),
    lang("uk_UA", "uk", "ukrainian"),
    lang("ur_PK", "ur", "urdu"),
    lang("ug_CN", "ug", "uyghur"),
    lang("uz_UZ", "uz", "uzbek"),
    lang("vi_VN", "vi", "vietnamese"),
    lang("cy_GB", "cy", "welsh"),
    lang("xh_ZA", "xh", "xhosa"),
    lang("yi_IL", "yi", "yiddish"),
    lang("yo_NG", "yo", "yoruba"),
    lang("zu_ZA", "zu", "zulu"),
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unknown language code or name: {0:?}; use a full code (e.g. \"en_US\"), \
     an alpha-1 code (e.g. \"en\") or an English language name (e.g. \"english\")"
)]
pub struct LangError(pub String);

pub fn by_full_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.full_code == code)
}

pub fn by_alpha1(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.alpha1 == code)
}

pub fn by_name(name: &str) -> Option<&'static Language> {
    let name = name.to_lowercase();
    LANGUAGES.iter().find(|l| l.name == name)
}

/// Alpha-1 code for a full code, e.g. `fr_FR` -> `fr`.
pub fn alpha1_of(full_code: &str) -> Option<&'static str> {
    by_full_code(full_code).map(|l| l.alpha1)
}

/// Maps a full code, alpha-1 code or English name to a full code.
/// `auto` passes through untouched.
pub fn normalize_lang(code: &str) -> Result<&'static str, LangError> {
    if code == AUTO {
        return Ok(AUTO);
    }
    by_full_code(code)
        .or_else(|| by_alpha1(code))
        .or_else(|| by_name(code))
        .map(|l| l.full_code)
        .ok_or_else(|| LangError(code.to_owned()))
}

//! Field extraction rules.
//!
//! Each rule reads a [`ModsDocument`] through its terminology and returns
//! flat values in document order. Rules never mutate the tree.

use std::collections::HashSet;

use crate::iso639;
use crate::terminology::{ModsDocument, TermAccessor, TermNode};

const ALTERNATIVE: &str = "alternative";

/// Nodes matched by a top-level term; empty when the term is absent.
fn nodes<'a>(mods: &'a ModsDocument, term: &str) -> Vec<TermNode<'a>> {
    mods.select(term)
        .map(|set| set.iter().collect())
        .unwrap_or_default()
}

/// Concatenated text of sub-term `name` under `node`.
fn sub_text(node: &TermNode<'_>, name: &str) -> String {
    node.get(name).map(|set| set.text()).unwrap_or_default()
}

fn is_alternative(title_info: &TermNode<'_>) -> bool {
    title_info.attr("type") == Some(ALTERNATIVE)
}

fn short_title(title_info: &TermNode<'_>) -> String {
    let non_sort = sub_text(title_info, "nonSort");
    let non_sort = non_sort.trim_end();
    let title = sub_text(title_info, "title");
    if non_sort.is_empty() {
        title
    } else {
        format!("{non_sort} {title}")
    }
}

/// `base` followed by `delimiter` and the subtitle, when there is one.
fn with_subtitle(title_info: &TermNode<'_>, base: String, delimiter: &str) -> String {
    let sub_title = sub_text(title_info, "subTitle");
    if sub_title.is_empty() {
        base
    } else {
        format!("{base}{delimiter}{sub_title}")
    }
}

/// `nonSort + " " + title` for every non-alternative title.
pub fn short_titles(mods: &ModsDocument) -> Vec<String> {
    nodes(mods, "title_info")
        .iter()
        .filter(|ti| !is_alternative(ti))
        .map(short_title)
        .collect()
}

/// Short titles extended with `delimiter + subTitle`.
pub fn full_titles(mods: &ModsDocument, delimiter: &str) -> Vec<String> {
    nodes(mods, "title_info")
        .iter()
        .filter(|ti| !is_alternative(ti))
        .map(|ti| with_subtitle(ti, short_title(ti), delimiter))
        .collect()
}

/// Title text of every `titleInfo[@type="alternative"]`.
pub fn alternative_titles(mods: &ModsDocument) -> Vec<String> {
    nodes(mods, "title_info")
        .iter()
        .filter(|ti| is_alternative(ti))
        .map(|ti| sub_text(ti, "title"))
        .collect()
}

/// Title used for sorting: `title + delimiter + subTitle`, without nonSort.
///
/// Taken from the first non-alternative titleInfo, or from an alternative
/// one when it is the record's only titleInfo.
pub fn sort_title(mods: &ModsDocument, delimiter: &str) -> Option<String> {
    let title_infos = nodes(mods, "title_info");
    let only_one = title_infos.len() == 1;
    title_infos
        .iter()
        .find(|ti| !is_alternative(ti) || only_one)
        .map(|ti| with_subtitle(ti, sub_text(ti, "title"), delimiter))
}

/// One display string per personal name.
///
/// Prefers displayForm, then `family, given`, then all nameParts run
/// together.
pub fn personal_names(mods: &ModsDocument) -> Vec<String> {
    nodes(mods, "personal_name")
        .iter()
        .map(|name| {
            let display = sub_text(name, "displayForm");
            if !display.is_empty() {
                return display;
            }
            let family = sub_text(name, "family_name");
            if !family.is_empty() {
                let given = sub_text(name, "given_name");
                return if !given.is_empty() {
                    format!("{family}, {given}")
                } else {
                    family
                };
            }
            sub_text(name, "namePart")
        })
        .collect()
}

/// One display string per corporate name: displayForm, else the nameParts.
pub fn corporate_names(mods: &ModsDocument) -> Vec<String> {
    nodes(mods, "corporate_name")
        .iter()
        .map(|name| {
            let display = sub_text(name, "displayForm");
            if !display.is_empty() {
                display
            } else {
                sub_text(name, "namePart")
            }
        })
        .collect()
}

fn is_code_separator(c: char) -> bool {
    matches!(c, ',' | '|' | ' ')
}

/// Language names, deduplicated in first-seen order.
///
/// ISO 639 codes are translated to English names. Codes from other
/// authorities and free-text terms are passed through.
pub fn languages(mods: &ModsDocument) -> Vec<String> {
    let mut result = Vec::new();
    for language in nodes(mods, "language") {
        let code_terms = language.get("code_term").map(|set| set.iter().collect::<Vec<_>>());
        for code in code_terms.unwrap_or_default() {
            let text = code.text();
            let is_iso = code.attr("authority").is_some_and(|a| a.starts_with("iso639"));
            if !is_iso {
                result.push(text);
                continue;
            }
            for token in text.split(is_code_separator).map(str::trim).filter(|t| !t.is_empty()) {
                match iso639::english_name(token) {
                    Ok(name) => result.push(name.to_string()),
                    Err(err) => {
                        tracing::warn!(code = token, error = %err, "no English name for language code");
                        result.push(token.to_string());
                    }
                }
            }
        }

        let text_terms = language.get("text_term").map(|set| set.texts());
        for text in text_terms.unwrap_or_default() {
            let text = text.trim();
            if !text.is_empty() {
                result.push(text.to_string());
            }
        }

        let has_terms = language.get("languageTerm").is_ok_and(|set| !set.is_empty());
        if !has_terms {
            result.push(language.text());
        }
    }
    dedup_in_order(result)
}

fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::reader::Reader;
    use crate::terminology::Terminology;

    fn mods(body: &str) -> ModsDocument {
        let xml = format!("<mods>{body}</mods>");
        let doc = Reader::new(false).from_str(&xml).unwrap();
        ModsDocument::new(doc, Terminology::namespace_free())
    }

    #[test]
    fn test_titles() {
        let m = mods(
            "<titleInfo><nonSort>The </nonSort><title>Great Gatsby</title><subTitle>A Novel</subTitle></titleInfo>",
        );
        assert_eq!(short_titles(&m), vec!["The Great Gatsby"]);
        assert_eq!(full_titles(&m, " : "), vec!["The Great Gatsby : A Novel"]);
        assert_eq!(sort_title(&m, " : ").as_deref(), Some("Great Gatsby : A Novel"));
        assert!(alternative_titles(&m).is_empty());
    }

    #[test]
    fn test_non_sort_without_trailing_space() {
        let m = mods("<titleInfo><nonSort>L'</nonSort><title>Étranger</title></titleInfo>");
        assert_eq!(short_titles(&m), vec!["L' Étranger"]);
    }

    #[test]
    fn test_missing_non_sort() {
        let m = mods("<titleInfo><title>Walden</title></titleInfo>");
        assert_eq!(short_titles(&m), vec!["Walden"]);
        assert_eq!(full_titles(&m, " : "), vec!["Walden"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let m = mods("<titleInfo><title>MODS</title><subTitle>Metadata</subTitle></titleInfo>");
        assert_eq!(full_titles(&m, " -- "), vec!["MODS -- Metadata"]);
        assert_eq!(sort_title(&m, "/").as_deref(), Some("MODS/Metadata"));
    }

    #[test]
    fn test_alternative_titles_are_separate() {
        let m = mods(
            "<titleInfo><title>Main</title></titleInfo>\
             <titleInfo type=\"alternative\"><title>Alt</title></titleInfo>",
        );
        assert_eq!(short_titles(&m), vec!["Main"]);
        assert_eq!(full_titles(&m, " : "), vec!["Main"]);
        assert_eq!(alternative_titles(&m), vec!["Alt"]);
        assert_eq!(sort_title(&m, " : ").as_deref(), Some("Main"));
    }

    #[test]
    fn test_sort_title_from_lone_alternative() {
        let m = mods("<titleInfo type=\"alternative\"><title>Only</title></titleInfo>");
        assert_eq!(sort_title(&m, " : ").as_deref(), Some("Only"));
        assert!(short_titles(&m).is_empty());

        let m = mods(
            "<titleInfo type=\"alternative\"><title>A</title></titleInfo>\
             <titleInfo type=\"alternative\"><title>B</title></titleInfo>",
        );
        assert_eq!(sort_title(&m, " : "), None);
        assert_eq!(sort_title(&mods(""), " : "), None);
    }

    #[test]
    fn test_namespaced_type_does_not_hide_alternative() {
        let m = mods(
            "<titleInfo xmlns:xlink=\"http://www.w3.org/1999/xlink\" xlink:type=\"simple\" type=\"alternative\"><title>Alt</title></titleInfo>\
             <titleInfo xmlns:xlink=\"http://www.w3.org/1999/xlink\" type=\"alternative\" xlink:type=\"simple\"><title>Alt 2</title></titleInfo>\
             <titleInfo><title>Main</title></titleInfo>",
        );
        assert_eq!(short_titles(&m), vec!["Main"]);
        assert_eq!(full_titles(&m, " : "), vec!["Main"]);
        assert_eq!(alternative_titles(&m), vec!["Alt", "Alt 2"]);
    }

    #[test]
    fn test_whitespace_display_form_wins() {
        let m = mods(
            "<name type=\"personal\"><displayForm> </displayForm><namePart type=\"family\">Doe</namePart><namePart type=\"given\">Jane</namePart></name>\
             <name type=\"personal\"><namePart type=\"family\">Roe</namePart><namePart type=\"given\"> </namePart></name>\
             <name type=\"corporate\"><displayForm> </displayForm><namePart>ACME</namePart></name>",
        );
        assert_eq!(personal_names(&m), vec![" ", "Roe,  "]);
        assert_eq!(corporate_names(&m), vec![" "]);
    }

    #[test]
    fn test_personal_names() {
        let m = mods(
            "<name type=\"personal\"><displayForm>Jane Doe</displayForm><namePart type=\"family\">Doe</namePart></name>\
             <name type=\"personal\"><displayForm></displayForm><namePart type=\"family\">Crusoe</namePart><namePart type=\"given\">Robinson</namePart></name>\
             <name type=\"personal\"><namePart type=\"family\">Homer</namePart></name>\
             <name type=\"personal\"><namePart>Aristotle</namePart><namePart>of Stagira</namePart></name>\
             <name type=\"corporate\"><namePart>Ignored</namePart></name>",
        );
        assert_eq!(
            personal_names(&m),
            vec!["Jane Doe", "Crusoe, Robinson", "Homer", "Aristotleof Stagira"]
        );
    }

    #[test]
    fn test_corporate_names() {
        let m = mods(
            "<name type=\"corporate\"><displayForm>ACME Corp.</displayForm><namePart>ACME</namePart></name>\
             <name type=\"corporate\"><namePart>Stanford University</namePart><namePart>Libraries</namePart></name>",
        );
        assert_eq!(corporate_names(&m), vec!["ACME Corp.", "Stanford UniversityLibraries"]);
    }

    #[test]
    fn test_languages_translate_iso_codes() {
        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">eng, fre</languageTerm></language>",
        );
        assert_eq!(languages(&m), vec!["English", "French"]);

        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">ger|lat  ita</languageTerm></language>",
        );
        assert_eq!(languages(&m), vec!["German", "Latin", "Italian"]);
    }

    #[test]
    fn test_languages_unknown_code_is_kept() {
        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">xyz</languageTerm></language>",
        );
        assert_eq!(languages(&m), vec!["xyz"]);

        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">eng xyz</languageTerm></language>",
        );
        assert_eq!(languages(&m), vec!["English", "xyz"]);
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_unknown_code_warning_names_token() {
        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">eng, xyz</languageTerm></language>",
        );
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || languages(&m));
        assert_eq!(result, vec!["English", "xyz"]);

        let logged = capture.contents();
        assert_eq!(logged.lines().count(), 1, "{logged}");
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("xyz"), "{logged}");
        assert!(!logged.contains("eng\""), "{logged}");
    }

    #[test]
    fn test_languages_other_sources() {
        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"rfc3066\">en-US</languageTerm></language>\
             <language><languageTerm type=\"code\">zz</languageTerm></language>\
             <language><languageTerm type=\"text\">  Klingon </languageTerm><languageTerm type=\"text\"> </languageTerm></language>\
             <language>Esperanto</language>",
        );
        assert_eq!(languages(&m), vec!["en-US", "zz", "Klingon", "Esperanto"]);
    }

    #[test]
    fn test_languages_deduplicated() {
        let m = mods(
            "<language><languageTerm type=\"code\" authority=\"iso639-2b\">eng</languageTerm><languageTerm type=\"text\">English</languageTerm></language>\
             <language><languageTerm type=\"code\" authority=\"iso639-1\">en</languageTerm></language>\
             <language><languageTerm type=\"code\" authority=\"iso639-2b\">fre</languageTerm></language>",
        );
        assert_eq!(languages(&m), vec!["English", "French"]);
    }

    #[test]
    fn test_untyped_language_term_suppresses_node_text() {
        let m = mods("<language><languageTerm>eng</languageTerm></language>");
        assert!(languages(&m).is_empty());
    }

    #[test]
    fn test_empty_record() {
        let m = ModsDocument::empty();
        assert!(short_titles(&m).is_empty());
        assert!(personal_names(&m).is_empty());
        assert!(languages(&m).is_empty());
        assert_eq!(sort_title(&m, " : "), None);
    }
}

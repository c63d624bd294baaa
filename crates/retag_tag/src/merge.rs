use alloc::vec::Vec;

use crate::entry::check_key;
use crate::option::option_name;
use crate::{OptionList, Tag, TagEntry, TagError, parse_tag, tag_of};

/// Inserts `option` into the entry for `key`, unless it is already present.
///
/// - If no entry has `key`, a new entry `key:"option"` is appended; `option`
///   becomes its value verbatim, so pass `,opt` for "no name, one option".
/// - Otherwise the first entry with `key` is inspected. Its name slot is
///   skipped and left untouched, then the options are scanned. `option` is
///   present if an option has the same name, or if `option` has the form
///   `name:value` and an option is called `name`. When absent it is appended
///   after a comma.
///
/// A leading comma on `option` does not take part in the presence check.
/// The input is not modified.
///
/// # Errors
///
/// `key` must be a valid entry key ([`TagError::InvalidKey`]) and `option`
/// must be a single option, `name` or `name:value` with an optional leading
/// comma. The value of the matching entry must be a valid option list.
///
/// # Examples
///
/// ```
/// use retag_tag::{add_option, TagEntry};
///
/// let entries = [TagEntry::new("json", "foo")];
/// let added = add_option(&entries, "json", "omitempty").unwrap();
/// assert_eq!(added, [TagEntry::new("json", "foo,omitempty")]);
///
/// // Already present, unchanged.
/// assert_eq!(add_option(&added, "json", "omitempty").unwrap(), added);
/// ```
pub fn add_option(entries: &[TagEntry], key: &str, option: &str) -> Result<Vec<TagEntry>, TagError> {
    check_key(key)?;
    option_name(option)?;

    let mut out = entries.to_vec();

    let Some(entry) = out.iter_mut().find(|entry| entry.key == key) else {
        log::trace!("appending new tag entry `{key}`");
        out.push(TagEntry::new(key, option));
        return Ok(out);
    };

    let present = OptionList::parse(&entry.value)?.contains(option)?;
    if present {
        log::trace!("option `{option}` already present in `{key}`");
    } else {
        if !option.starts_with(',') {
            entry.value.push(',');
        }
        entry.value.push_str(option);
    }
    Ok(out)
}

/// Parses `tag`, inserts `option` for `key` and serializes the result.
///
/// See [`add_option`] for the insertion rules.
///
/// # Examples
///
/// ```
/// use retag_tag::add_tag_option;
///
/// let tag = add_tag_option(r#"json:",omitzero""#, "json", "omitempty").unwrap();
/// assert_eq!(tag.as_str(), r#"json:",omitzero,omitempty""#);
///
/// let tag = add_tag_option(r#"json:"foo""#, "bar", ",baz").unwrap();
/// assert_eq!(tag.as_str(), r#"json:"foo" bar:",baz""#);
/// ```
pub fn add_tag_option(tag: &str, key: &str, option: &str) -> Result<Tag, TagError> {
    let entries = parse_tag(tag)?;
    let entries = add_option(&entries, key, option)?;
    Ok(tag_of(&entries))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{add_option, add_tag_option};
    use crate::{TagEntry, TagError, parse_tag};

    #[test]
    fn add_tag_option_table() {
        struct Case {
            input: &'static str,
            key: &'static str,
            option: &'static str,
            expected: &'static str,
        }

        let cases = [
            Case {
                input: r#"json:"foo""#,
                key: "json",
                option: "omitempty",
                expected: r#"json:"foo,omitempty""#,
            },
            Case {
                input: r#"json:"'\\xde\\xad\\xbe\\xef'""#,
                key: "json",
                option: "omitzero",
                expected: r#"json:"'\\xde\\xad\\xbe\\xef',omitzero""#,
            },
            Case {
                input: r#"json:",omitzero""#,
                key: "json",
                option: "omitempty",
                expected: r#"json:",omitzero,omitempty""#,
            },
            Case {
                input: r#"json:",omitzero""#,
                key: "json",
                option: "omitzero",
                expected: r#"json:",omitzero""#,
            },
            Case {
                input: r#"json:",omitempty""#,
                key: "json",
                option: "format:booboo",
                expected: r#"json:",omitempty,format:booboo""#,
            },
            Case {
                input: r#"json:",format:fizzbuzz""#,
                key: "json",
                option: "format:booboo",
                expected: r#"json:",format:fizzbuzz""#,
            },
            Case {
                input: r#"json:",format:fizzbuzz""#,
                key: "json",
                option: "omitempty",
                expected: r#"json:",format:fizzbuzz,omitempty""#,
            },
            Case {
                input: r#"json:"foo""#,
                key: "bar",
                option: "baz",
                expected: r#"json:"foo" bar:"baz""#,
            },
            Case {
                input: r#"json:"foo""#,
                key: "bar",
                option: ",baz",
                expected: r#"json:"foo" bar:",baz""#,
            },
            Case {
                input: r#"json:"foo" bar:",foo""#,
                key: "bar",
                option: "baz",
                expected: r#"json:"foo" bar:",foo,baz""#,
            },
        ];

        for case in cases {
            let added = add_tag_option(case.input, case.key, case.option).unwrap();
            assert_eq!(added.as_str(), case.expected, "input = {}", case.input);
        }
    }

    #[test]
    fn comma_prefixed_option_is_idempotent() {
        let once = add_tag_option(r#"json:"foo""#, "json", ",omitzero").unwrap();
        assert_eq!(once.as_str(), r#"json:"foo,omitzero""#);
        let twice = add_tag_option(once.as_str(), "json", ",omitzero").unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn insertion_is_idempotent() {
        let inputs = [
            r#"json:"foo""#,
            r#"json:"" xml:"x""#,
            r#"json:"'a,b',string""#,
            r#"json:",format:x""#,
        ];
        for input in inputs {
            for option in ["omitempty", "format:y", ",omitzero"] {
                let once = add_tag_option(input, "json", option).unwrap();
                let twice = add_tag_option(once.as_str(), "json", option).unwrap();
                assert_eq!(once, twice, "input = {input}, option = {option}");
            }
        }
    }

    #[test]
    fn new_entry_value_is_verbatim() {
        // Without a leading comma the option lands in the name slot.
        let added = add_tag_option("", "json", "omitempty").unwrap();
        assert_eq!(added.as_str(), r#"json:"omitempty""#);
        let again = add_tag_option(added.as_str(), "json", "omitempty").unwrap();
        assert_eq!(again.as_str(), r#"json:"omitempty,omitempty""#);

        let added = add_tag_option("", "json", ",omitempty").unwrap();
        assert_eq!(add_tag_option(added.as_str(), "json", ",omitempty").unwrap(), added);
    }

    #[test]
    fn name_slot_is_preserved() {
        let entries = parse_tag(r#"json:"'a,b',string" db:"id""#).unwrap();
        let added = add_option(&entries, "json", "omitempty").unwrap();
        assert!(added[0].value.starts_with("'a,b',"));
        assert_eq!(added[0].value, "'a,b',string,omitempty");
        assert_eq!(added[1], entries[1]);

        let added = add_option(&entries, "db", "pk").unwrap();
        assert_eq!(added[1].value, "id,pk");
    }

    #[test]
    fn empty_value_gets_comma() {
        let added = add_tag_option(r#"json:"""#, "json", "omitempty").unwrap();
        assert_eq!(added.as_str(), r#"json:",omitempty""#);
    }

    #[test]
    fn only_first_matching_entry_changes() {
        let entries = [TagEntry::new("json", "a"), TagEntry::new("json", "b")];
        let added = add_option(&entries, "json", "omitempty").unwrap();
        assert_eq!(added[0].value, "a,omitempty");
        assert_eq!(added[1].value, "b");
    }

    #[test]
    fn errors_propagate() {
        assert_eq!(
            add_tag_option("json", "json", "omitempty"),
            Err(TagError::UnpairedKey { rest: "json".to_string() })
        );
        assert_eq!(
            add_tag_option(r#"json:"foo,""#, "json", "omitempty"),
            Err(TagError::MalformedOption { value: "foo,".to_string() })
        );
        // Malformed values under other keys are never scanned.
        assert!(add_tag_option(r#"json:"foo," xml:"x""#, "xml", "attr").is_ok());
    }

    #[test]
    fn option_must_be_single_token() {
        for option in ["", ","] {
            assert_eq!(add_tag_option(r#"json:"foo""#, "json", option), Err(TagError::UnexpectedEnd));
            assert_eq!(add_tag_option("", "json", option), Err(TagError::UnexpectedEnd));
        }
        assert_eq!(
            add_tag_option(r#"json:"foo""#, "json", "a,b"),
            Err(TagError::MalformedOption { value: "a,b".to_string() })
        );
        assert_eq!(
            add_tag_option(r#"json:"foo""#, "json", "omit empty"),
            Err(TagError::MalformedOption { value: "omit empty".to_string() })
        );

        // Quoted options are single tokens and stay idempotent.
        let once = add_tag_option(r#"json:"foo""#, "json", "'a,b'").unwrap();
        assert_eq!(once.as_str(), r#"json:"foo,'a,b'""#);
        assert_eq!(add_tag_option(once.as_str(), "json", "'a,b'").unwrap(), once);
    }

    #[test]
    fn key_must_be_writable() {
        for key in ["", "bad key", "a:b", "a\"b", "tab\t", "del\u{7f}"] {
            assert_eq!(
                add_tag_option(r#"json:"foo""#, key, ",x"),
                Err(TagError::InvalidKey { key: key.to_string() })
            );
        }

        let added = add_tag_option(r#"json:"foo""#, "db-üñ", ",x").unwrap();
        assert_eq!(parse_tag(added.as_str()).unwrap()[1], TagEntry::new("db-üñ", ",x"));
    }
}

// Capitalization reconciliation between typed words and dictionary variants

use ispell_core::case::{CapType, classify, region_has_case, set_region_case};
use ispell_core::charset::{CharTables, Ichar};
use ispell_core::enums::{CAP_TYPE_MASK, MAX_CAPS, MORE_VARIANTS};
use ispell_hash::Dictionary;

use super::hits::{Hit, HitList};

/// True if the case of `word` is legal for the root and affixes of `hit`.
///
/// An all-caps word is always legal. Otherwise some variant of the root must
/// have the word's capitalization type and allow the hit's affixes; an
/// any-case variant also accepts a capitalized word. Follow-case variants
/// must match their stored exemplar letter for letter over the root, and the
/// affixed regions must take the case of the exemplar character they touch.
pub fn cap_ok(dict: &Dictionary, word: &[Ichar], hit: &Hit) -> bool {
    let tables = dict.tables();
    let word_cap = classify(word, tables);
    if word_cap == CapType::AllCaps {
        return true;
    }
    let (pre_strip, pre_add) = hit.prefix_lens(dict);
    let (_, suf_add) = hit.suffix_lens(dict);

    for id in dict.case_chain(hit.root) {
        let variant = dict.entry(id);
        let dict_cap = variant.cap_type();
        let affixes_ok = hit.affixes_allowed_by(dict, variant.mask());
        if dict_cap != word_cap {
            if dict_cap == CapType::AnyCase && word_cap == CapType::Capitalized && affixes_ok {
                return true;
            }
        } else if dict_cap == CapType::FollowCase {
            let follows = variant
                .word()
                .is_some_and(|ex| follows_exemplar(tables, word, ex, pre_strip, pre_add, suf_add));
            if follows && affixes_ok {
                return true;
            }
        } else if affixes_ok {
            return true;
        }
    }
    false
}

/// Region-by-region comparison of `word` against a follow-case exemplar.
fn follows_exemplar(
    tables: &CharTables,
    word: &[Ichar],
    exemplar: &[Ichar],
    pre_strip: usize,
    pre_add: usize,
    suf_add: usize,
) -> bool {
    let Some(root_end) = word.len().checked_sub(suf_add) else {
        return false;
    };
    if pre_add >= root_end {
        return false;
    }
    let root = &word[pre_add..root_end];
    let Some(stem) = exemplar.get(pre_strip..pre_strip + root.len()) else {
        return false;
    };
    if root != stem {
        return false;
    }
    let prefix_upper = tables.is_upper(stem[0]);
    let suffix_upper = tables.is_upper(stem[stem.len() - 1]);
    region_has_case(&word[..pre_add], prefix_upper, tables)
        && region_has_case(&word[root_end..], suffix_upper, tables)
}

fn lowercased(tables: &CharTables, word: &[Ichar]) -> Vec<Ichar> {
    let mut w = word.to_vec();
    tables.lowcase(&mut w);
    w
}

fn capitalized(tables: &CharTables, word: &[Ichar]) -> Vec<Ichar> {
    let mut w = lowercased(tables, word);
    if let Some(first) = w.first_mut() {
        *first = tables.to_upper(*first);
    }
    w
}

/// Correctly cased renderings of the candidate `word`, guided by the case
/// of the user's `pattern`.
///
/// Hits are visited most recent first and at most [`MAX_CAPS`] forms are
/// produced. Forms may repeat; the possibility list removes duplicates.
pub fn case_forms(dict: &Dictionary, word: &[Ichar], pattern: &[Ichar], hits: &HitList) -> Vec<Vec<Ichar>> {
    let mut out = Vec::new();
    if word.is_empty() {
        return out;
    }
    for hit in hits.as_slice().iter().rev() {
        if out.len() >= MAX_CAPS {
            break;
        }
        root_case_forms(dict, word, pattern, hit, &mut out);
    }
    out.truncate(MAX_CAPS);
    out
}

fn root_case_forms(dict: &Dictionary, word: &[Ichar], pattern: &[Ichar], hit: &Hit, out: &mut Vec<Vec<Ichar>>) {
    let t = dict.tables();
    let head = dict.entry(hit.root);

    // Roots that only exist in capitals
    if head.mask() & (CAP_TYPE_MASK | MORE_VARIANTS) == CapType::AllCaps.mask_bits() {
        out.push(t.to_uppercase(word));
        return;
    }
    if !pattern.iter().any(|&c| t.is_lower(c)) {
        out.push(t.to_uppercase(word));
        return;
    }

    let first_upper = pattern.first().is_some_and(|&c| t.is_upper(c));
    let simple = !pattern.iter().skip(1).any(|&c| t.is_upper(c));
    if simple {
        let simple_form = if first_upper { capitalized(t, word) } else { lowercased(t, word) };
        match head.cap_type() {
            CapType::Capitalized if first_upper => {
                out.push(simple_form);
                return;
            }
            CapType::AnyCase => {
                out.push(simple_form);
                return;
            }
            _ => {}
        }
        let legal = dict.case_chain(hit.root).any(|id| {
            let v = dict.entry(id);
            hit.affixes_allowed_by(dict, v.mask())
                && match v.cap_type() {
                    CapType::AnyCase => true,
                    CapType::Capitalized => first_upper,
                    _ => false,
                }
        });
        if legal {
            out.push(simple_form);
            return;
        }
    }

    let (pre_strip, pre_add) = hit.prefix_lens(dict);
    let (suf_strip, suf_add) = hit.suffix_lens(dict);
    for id in dict.case_chain(hit.root) {
        if out.len() >= MAX_CAPS {
            break;
        }
        let v = dict.entry(id);
        if !hit.affixes_allowed_by(dict, v.mask()) {
            continue;
        }
        match v.cap_type() {
            CapType::AllCaps => out.push(t.to_uppercase(word)),
            CapType::Capitalized => out.push(capitalized(t, word)),
            CapType::AnyCase if first_upper => out.push(capitalized(t, word)),
            CapType::AnyCase => out.push(lowercased(t, word)),
            CapType::FollowCase => {
                if let Some(form) = v
                    .word()
                    .and_then(|ex| transfer_case(t, word, ex, pre_strip, pre_add, suf_strip, suf_add))
                {
                    out.push(form);
                }
            }
        }
    }
}

/// Rebuild `word` around a follow-case exemplar: the exemplar's own text for
/// the root, and affix text recased to match the exemplar character it joins.
fn transfer_case(
    tables: &CharTables,
    word: &[Ichar],
    exemplar: &[Ichar],
    pre_strip: usize,
    pre_add: usize,
    suf_strip: usize,
    suf_add: usize,
) -> Option<Vec<Ichar>> {
    let mid_end = exemplar.len().checked_sub(suf_strip)?;
    if pre_strip >= mid_end || word.len() < pre_add + suf_add {
        return None;
    }
    let mut prefix = word[..pre_add].to_vec();
    set_region_case(&mut prefix, tables.is_upper(exemplar[pre_strip]), tables);
    let mut suffix = word[word.len() - suf_add..].to_vec();
    set_region_case(&mut suffix, tables.is_upper(exemplar[mid_end - 1]), tables);

    let mut form = prefix;
    form.extend_from_slice(&exemplar[pre_strip..mid_end]);
    form.extend(suffix);
    Some(form)
}

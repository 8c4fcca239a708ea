/// Turn a file stem such as `chapter_one_intro` into `Chapter One Intro`.
///
/// Underscores become spaces; the first letter of every run of letters is
/// upper-cased and the rest of the run lower-cased.
pub fn title_from_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut at_word_start = true;

    for ch in stem.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if at_word_start {
                title.extend(ch.to_uppercase());
            } else {
                title.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            title.push(ch);
            at_word_start = true;
        }
    }

    title
}

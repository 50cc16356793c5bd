use std::cmp::Ordering;

/// Compare two display names the way a Spanish-speaking reader would sort them.
///
/// Case and accents are ignored first ("ángel" sits next to "Angel"), `ñ` sorts after
/// `n`, and the raw strings settle whatever is left so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let key_a: Vec<(char, u8)> = a.chars().map(fold).collect();
    let key_b: Vec<(char, u8)> = b.chars().map(fold).collect();
    key_a.cmp(&key_b).then_with(|| a.cmp(b))
}

/// Primary sort key for one character: the base letter plus a rank that keeps
/// `ñ` strictly after every `n`.
fn fold(c: char) -> (char, u8) {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'Á' | 'À' | 'Â' | 'Ä' => ('a', 0),
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => ('e', 0),
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => ('i', 0),
        'ó' | 'ò' | 'ô' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Ö' => ('o', 0),
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => ('u', 0),
        'ñ' | 'Ñ' => ('n', 1),
        'ç' | 'Ç' => ('c', 0),
        other => {
            let lower = other.to_lowercase().next().unwrap_or(other);
            (lower, 0)
        }
    }
}

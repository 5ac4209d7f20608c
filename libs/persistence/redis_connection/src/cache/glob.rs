//! Redis `MATCH` compatible glob matching for backends that have to scan
//! their own keyspace.
//!
//! Supported syntax: `*`, `?`, `[abc]`, `[a-z]`, `[^a]` and `\` escapes.
//! An unterminated `[` is matched literally.

pub fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    matches(&pattern, &key)
}

fn matches(p: &[char], k: &[char]) -> bool {
    let (mut pi, mut ki) = (0, 0);
    // Position right after the last `*` and the key index it is trying to
    // absorb up to.
    let mut star: Option<(usize, usize)> = None;

    while ki < k.len() {
        if pi < p.len() {
            match p[pi] {
                '*' => {
                    star = Some((pi + 1, ki));
                    pi += 1;
                    continue;
                }
                '?' => {
                    pi += 1;
                    ki += 1;
                    continue;
                }
                '[' => {
                    match match_class(p, pi, k[ki]) {
                        Some((true, next)) => {
                            pi = next;
                            ki += 1;
                            continue;
                        }
                        Some((false, _)) => {}
                        None if k[ki] == '[' => {
                            pi += 1;
                            ki += 1;
                            continue;
                        }
                        None => {}
                    }
                }
                '\\' if pi + 1 < p.len() => {
                    if p[pi + 1] == k[ki] {
                        pi += 2;
                        ki += 1;
                        continue;
                    }
                }
                c => {
                    if c == k[ki] {
                        pi += 1;
                        ki += 1;
                        continue;
                    }
                }
            }
        }

        match star {
            Some((after_star, absorbed)) => {
                pi = after_star;
                ki = absorbed + 1;
                star = Some((after_star, absorbed + 1));
            }
            None => return false,
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Matches `c` against the class opening at `start`. Returns whether it
/// matched and the index right after the closing `]`, or `None` when the
/// class is never closed.
fn match_class(p: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negate = i < p.len() && p[i] == '^';
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < p.len() {
        if p[i] == ']' {
            return Some((matched != negate, i + 1));
        }
        if p[i] == '\\' && i + 1 < p.len() {
            matched |= p[i + 1] == c;
            i += 2;
        }
        else if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            let (lo, hi) = if p[i] <= p[i + 2] {
                (p[i], p[i + 2])
            }
            else {
                (p[i + 2], p[i])
            };
            matched |= lo <= c && c <= hi;
            i += 3;
        }
        else {
            matched |= p[i] == c;
            i += 1;
        }
    }
    None
}

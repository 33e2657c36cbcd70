//! Natural ordering of names: digit runs compare by numeric value, so
//! `T2` sorts before `T10`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two names in natural order.
///
/// Runs of ASCII digits compare numerically (of any length, without
/// overflow); everything else compares character by character. Numerically
/// equal runs with different zero padding order the shorter run first, so
/// the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let ord = cmp_digit_runs(&take_digits(&mut a), &take_digits(&mut b));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a_value = a.trim_start_matches('0');
    let b_value = b.trim_start_matches('0');
    a_value
        .len()
        .cmp(&b_value.len())
        .then_with(|| a_value.cmp(b_value))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|&n| n.to_owned()).collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn digit_runs_compare_numerically() {
        assert_eq!(sorted(&["T10", "T2", "T1"]), vec!["T1", "T2", "T10"]);
        assert_eq!(
            sorted(&["a10b2", "a10b10", "a9"]),
            vec!["a9", "a10b2", "a10b10"]
        );
    }

    #[test]
    fn prefixes_sort_first() {
        assert_eq!(natural_cmp("Node", "NodeList"), Ordering::Less);
        assert_eq!(natural_cmp("x", "x"), Ordering::Equal);
    }

    #[test]
    fn padding_breaks_ties() {
        assert_eq!(natural_cmp("v01", "v1"), Ordering::Greater);
        assert_eq!(natural_cmp("v001", "v2"), Ordering::Less);
    }

    #[test]
    fn long_runs_do_not_overflow() {
        assert_eq!(
            natural_cmp("n99999999999999999999999", "n100000000000000000000000"),
            Ordering::Less
        );
    }
}

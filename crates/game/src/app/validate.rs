use super::levels::Solution;

/// Exact-match check for a coordinate guess. Whitespace anywhere in the
/// answer is stripped before comparing, so "44.1, -123.2" and "44.1,-123.2"
/// are the same guess. Everything else is byte-for-byte: no rounding, no
/// tolerance radius, no case folding.
pub fn answer_matches(answer: &str, solution: &Solution) -> bool {
    let stripped: String = answer.chars().filter(|ch| !ch.is_whitespace()).collect();
    stripped == solution.joined()
}

//! Keyword list parsing and the common-node set.

use std::collections::BTreeSet;

use super::model::strip_code_fence;

/// Ids present verbatim in both systems' keyword lists.
pub type CommonNodes = BTreeSet<String>;

/// Split a `keyword[:weight], ...` string into bare keywords, in order.
///
/// Weight suffixes are dropped; they are only hints for the language model.
/// Tokens are trimmed and empty ones skipped. Duplicates are kept.
pub fn parse_keywords(input: &str) -> Vec<String> {
	input
		.split(',')
		.filter_map(|token| {
			let keyword = token.split(':').next().unwrap_or_default().trim();
			(!keyword.is_empty()).then(|| keyword.to_string())
		})
		.collect()
}

/// Keywords appearing in both lists (case-sensitive).
pub fn common_keywords(a: &[String], b: &[String]) -> CommonNodes {
	let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
	a.iter()
		.filter(|kw| b.contains(kw.as_str()))
		.cloned()
		.collect()
}

/// Normalise a comma-separated model reply: drop code fences and line
/// breaks, and collapse the whitespace that follows each comma.
pub fn clean_listing(reply: &str) -> String {
	let body: String = strip_code_fence(reply)
		.chars()
		.filter(|&c| c != '\n' && c != '\r')
		.collect();

	let mut out = String::with_capacity(body.len());
	let mut after_comma = false;
	for c in body.trim().chars() {
		if after_comma && c.is_whitespace() {
			continue;
		}
		after_comma = c == ',';
		out.push(c);
	}
	out
}

/// Append suggested pairs to the explicit-links field.
pub fn append_links(existing: &str, suggestions: &str) -> String {
	let existing = existing.trim();
	let suggestions = suggestions.trim();
	match (existing.is_empty(), suggestions.is_empty()) {
		(_, true) => existing.to_string(),
		(true, false) => suggestions.to_string(),
		(false, false) => format!("{existing}, {suggestions}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kws(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn strips_weights_and_whitespace() {
		assert_eq!(
			parse_keywords(" design:10, product:9 ,user experience:7,team"),
			kws(&["design", "product", "user experience", "team"])
		);
	}

	#[test]
	fn drops_empty_tokens_and_keeps_duplicates() {
		assert_eq!(
			parse_keywords("a, ,b:3,,:4, a"),
			kws(&["a", "b", "a"])
		);
		assert!(parse_keywords("").is_empty());
		assert!(parse_keywords(" , : ").is_empty());
	}

	#[test]
	fn reparsing_joined_output_is_stable() {
		let inputs = [
			"design:10, product:9, management:9",
			" a ,b:2,, c:x:y ",
			"solo",
			"",
		];
		for input in inputs {
			let once = parse_keywords(input);
			let twice = parse_keywords(&once.join(","));
			assert_eq!(once, twice, "input {input:?}");
		}
	}

	#[test]
	fn common_is_exact_and_commutative() {
		let a = kws(&["design", "Brand", "team", "design"]);
		let b = kws(&["brand", "team", "design", "startup"]);
		let ab = common_keywords(&a, &b);
		assert_eq!(ab, common_keywords(&b, &a));
		assert_eq!(ab.into_iter().collect::<Vec<_>>(), kws(&["design", "team"]));
	}

	#[test]
	fn common_of_disjoint_lists_is_empty() {
		assert!(common_keywords(&kws(&["a"]), &kws(&["b"])).is_empty());
		assert!(common_keywords(&[], &kws(&["b"])).is_empty());
	}

	#[test]
	fn cleans_model_listings() {
		assert_eq!(
			clean_listing("  design-startup,\n product-market,   team-business \n"),
			"design-startup,product-market,team-business"
		);
		assert_eq!(
			clean_listing("```\nai:10, ml:9\n```"),
			"ai:10,ml:9"
		);
	}

	#[test]
	fn cleans_single_line_fenced_listings() {
		assert_eq!(clean_listing("```ai:10, ml:9```"), "ai:10,ml:9");
		assert_eq!(clean_listing("```text design-brand, team-startup```"), "design-brand,team-startup");
	}

	#[test]
	fn appends_suggestions() {
		assert_eq!(append_links("", "a-b,c-d"), "a-b,c-d");
		assert_eq!(append_links(" x-y ", "a-b"), "x-y, a-b");
		assert_eq!(append_links("x-y", "  "), "x-y");
	}
}

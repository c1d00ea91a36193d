//! Contact form detection
//!
//! Site templates do not agree on how the contact form is marked up, so the
//! form is looked up with an ordered list of [`LookupStrategy`] values. The
//! first strategy that matches wins.

use crate::dom::ElementQuery;
use zappy_conf::LookupStrategy;

/// Result of [`locate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Located<E> {
	Found {
		strategy: LookupStrategy,
		/// Position of `strategy` in the list that was searched.
		index: usize,
		element: E,
	},
	NotFound,
}

impl<E> Located<E> {
	pub fn is_found(&self) -> bool {
		matches!(self, Located::Found { .. })
	}

	pub fn element(&self) -> Option<&E> {
		match self {
			Located::Found { element, .. } => Some(element),
			Located::NotFound => None,
		}
	}

	pub fn into_element(self) -> Option<E> {
		match self {
			Located::Found { element, .. } => Some(element),
			Located::NotFound => None,
		}
	}
}

/// Tries each strategy in order and returns the first match.
///
/// A selector the document rejects is logged and skipped.
pub fn locate<Q: ElementQuery>(query: &Q, strategies: &[LookupStrategy]) -> Located<Q::Element> {
	for (index, strategy) in strategies.iter().enumerate() {
		let hit = match strategy {
			LookupStrategy::Selector(selector) => match query.query_selector(selector) {
				Ok(hit) => hit,
				Err(e) => {
					crate::warn_log!("Zappy: skipping form lookup '{}': {}", selector, e);
					None
				}
			},
			LookupStrategy::Id(id) => query.get_element_by_id(id),
		};

		if let Some(element) = hit {
			crate::debug_log!("Zappy: form matched by {}", strategy);
			return Located::Found {
				strategy: strategy.clone(),
				index,
				element,
			};
		}
	}
	Located::NotFound
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::FormSurface;
	use crate::testing::{MockDocument, MockForm};
	use rstest::rstest;
	use zappy_conf::FormSettings;

	fn default_strategies() -> Vec<LookupStrategy> {
		FormSettings::default().selectors
	}

	#[rstest]
	fn test_first_strategy_wins() {
		let document = MockDocument::new()
			.with_selector("form", MockForm::new(vec![]).with_id("newsletter"))
			.with_selector(".contact-form", MockForm::new(vec![]).with_class("contact-form"));

		let located = locate(&document, &default_strategies());

		match located {
			Located::Found {
				strategy,
				index,
				element,
			} => {
				assert_eq!(strategy, LookupStrategy::selector(".contact-form"));
				assert_eq!(index, 0);
				assert_eq!(element.describe(), "contact-form");
			}
			Located::NotFound => panic!("form not found"),
		}
	}

	#[rstest]
	fn test_id_strategy() {
		let document = MockDocument::new().with_id("contactForm", MockForm::new(vec![]).with_id("contactForm"));

		let located = locate(&document, &default_strategies());

		assert!(matches!(
			located,
			Located::Found { index: 4, ref strategy, .. } if *strategy == LookupStrategy::id("contactForm")
		));
	}

	#[rstest]
	fn test_falls_back_to_any_form() {
		let document = MockDocument::new().with_selector("form", MockForm::new(vec![]));

		let located = locate(&document, &default_strategies());

		assert_eq!(located.element().map(|f| f.describe()).as_deref(), Some("unnamed form"));
	}

	#[rstest]
	fn test_not_found_is_explicit() {
		let located = locate(&MockDocument::new(), &default_strategies());
		assert_eq!(located, Located::NotFound);
		assert!(located.into_element().is_none());
	}

	#[rstest]
	fn test_invalid_selector_is_skipped() {
		let document = MockDocument::new()
			.with_invalid_selector("form[action*=")
			.with_selector("form", MockForm::new(vec![]));
		let strategies = vec![
			LookupStrategy::selector("form[action*="),
			LookupStrategy::selector("form"),
		];

		assert!(matches!(locate(&document, &strategies), Located::Found { index: 1, .. }));
	}
}

//! Favorable / unfavorable element selection.
//!
//! A weak day master is supported by what produces it and by its own
//! element; a balanced or strong one is tempered by what it produces and
//! what it overcomes. The unfavorable set is always the other table.

use crate::domain::model::{Element, Strength};

/// `[producer, self]`, indexed by element.
static GENERATIVE: [[Element; 2]; 5] = [
    [Element::Water, Element::Wood],
    [Element::Wood, Element::Fire],
    [Element::Fire, Element::Earth],
    [Element::Earth, Element::Metal],
    [Element::Metal, Element::Water],
];

/// `[produced, overcome]`, indexed by element.
static DRAINING: [[Element; 2]; 5] = [
    [Element::Fire, Element::Earth],
    [Element::Earth, Element::Metal],
    [Element::Metal, Element::Water],
    [Element::Water, Element::Wood],
    [Element::Wood, Element::Fire],
];

pub fn generative(element: Element) -> &'static [Element] {
    &GENERATIVE[element.index()]
}

pub fn draining(element: Element) -> &'static [Element] {
    &DRAINING[element.index()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelection {
    pub favorable: Vec<Element>,
    pub unfavorable: Vec<Element>,
}

pub struct FavorableElementSelector;

impl FavorableElementSelector {
    pub fn select(strength: Strength, day_element: Element) -> ElementSelection {
        let (favorable, unfavorable) = match strength {
            Strength::Weak => (generative(day_element), draining(day_element)),
            Strength::Balanced | Strength::Strong => {
                (draining(day_element), generative(day_element))
            }
        };
        ElementSelection {
            favorable: favorable.to_vec(),
            unfavorable: unfavorable.to_vec(),
        }
    }
}

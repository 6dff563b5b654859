//! Inventory operations for agents.
//!
//! Provides methods for adding, removing, and querying items with checked
//! arithmetic, plus the two multi-item operations settlement needs:
//! crafting from a recipe and a one-for-one swap between two inventories.
//! Both are atomic: on any failure neither inventory changes.
//!
//! A key is removed when its count reaches zero, so an inventory never holds
//! explicit zero entries.

use microworld_types::{Inventory, Item, Recipe};

use crate::error::AgentError;

/// Count of one item; zero when absent.
pub fn count(inventory: &Inventory, item: Item) -> u32 {
    inventory.get(&item).copied().unwrap_or(0)
}

/// Whether the inventory holds at least `amount` of `item`.
pub fn has_item(inventory: &Inventory, item: Item, amount: u32) -> bool {
    count(inventory, item) >= amount
}

/// Total quantity of an item across several inventories.
pub fn total_of<'a>(inventories: impl IntoIterator<Item = &'a Inventory>, item: Item) -> u64 {
    inventories
        .into_iter()
        .map(|inv| u64::from(count(inv, item)))
        .fold(0_u64, u64::saturating_add)
}

/// Add `amount` units of `item` to the inventory.
///
/// Adding zero is a no-op and does not create a key.
pub fn add_item(inventory: &mut Inventory, item: Item, amount: u32) -> Result<(), AgentError> {
    if amount == 0 {
        return Ok(());
    }
    let entry = inventory.entry(item).or_insert(0);
    *entry = entry
        .checked_add(amount)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: format!("adding {amount} {item}"),
        })?;
    Ok(())
}

/// Remove `amount` units of `item` from the inventory.
///
/// Fails if the agent does not hold enough of the item.
/// Removes the key entirely if quantity reaches zero.
pub fn remove_item(inventory: &mut Inventory, item: Item, amount: u32) -> Result<(), AgentError> {
    let current = count(inventory, item);

    if current < amount {
        return Err(AgentError::InsufficientItem {
            item,
            requested: amount,
            available: current,
        });
    }

    let remaining = current
        .checked_sub(amount)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: String::from("subtraction underflow in remove_item"),
        })?;

    if remaining == 0 {
        inventory.remove(&item);
    } else {
        inventory.insert(item, remaining);
    }

    Ok(())
}

/// Whether every input of the recipe is present.
pub fn can_craft(inventory: &Inventory, recipe: Recipe) -> bool {
    recipe
        .inputs()
        .iter()
        .all(|&(item, qty)| has_item(inventory, item, qty))
}

/// Consume the recipe's inputs and credit one unit of its output.
///
/// Works on a scratch copy and commits only on success.
pub fn craft(inventory: &mut Inventory, recipe: Recipe) -> Result<(), AgentError> {
    let mut scratch = inventory.clone();
    for &(item, qty) in recipe.inputs() {
        remove_item(&mut scratch, item, qty)?;
    }
    add_item(&mut scratch, recipe.output(), 1)?;
    *inventory = scratch;
    Ok(())
}

/// Swap one unit: `initiator` gives one `offer` and receives one `request`
/// from `partner`.
///
/// Both sides are computed on scratch copies; neither inventory changes
/// unless the whole swap succeeds.
pub fn swap_one(
    initiator: &mut Inventory,
    partner: &mut Inventory,
    offer: Item,
    request: Item,
) -> Result<(), AgentError> {
    let mut mine = initiator.clone();
    let mut theirs = partner.clone();

    remove_item(&mut mine, offer, 1)?;
    remove_item(&mut theirs, request, 1)?;
    add_item(&mut mine, request, 1)?;
    add_item(&mut theirs, offer, 1)?;

    *initiator = mine;
    *partner = theirs;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(items: &[(Item, u32)]) -> Inventory {
        items.iter().copied().collect()
    }

    #[test]
    fn count_absent_is_zero() {
        assert_eq!(count(&Inventory::new(), Item::Wood), 0);
        assert!(has_item(&Inventory::new(), Item::Wood, 0));
        assert!(!has_item(&Inventory::new(), Item::Wood, 1));
    }

    #[test]
    fn add_item_stacks() {
        let mut inv = Inventory::new();
        assert!(add_item(&mut inv, Item::Wood, 2).is_ok());
        assert!(add_item(&mut inv, Item::Wood, 3).is_ok());
        assert_eq!(count(&inv, Item::Wood), 5);
    }

    #[test]
    fn add_zero_creates_no_key() {
        let mut inv = Inventory::new();
        assert!(add_item(&mut inv, Item::Spear, 0).is_ok());
        assert!(inv.is_empty());
    }

    #[test]
    fn add_item_overflow_is_error() {
        let mut inv = inventory(&[(Item::Food, u32::MAX)]);
        let result = add_item(&mut inv, Item::Food, 1);
        assert!(matches!(result, Err(AgentError::ArithmeticOverflow { .. })));
        assert_eq!(count(&inv, Item::Food), u32::MAX);
    }

    #[test]
    fn remove_to_zero_drops_key() {
        let mut inv = inventory(&[(Item::Flint, 1)]);
        assert!(remove_item(&mut inv, Item::Flint, 1).is_ok());
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_insufficient_leaves_inventory() {
        let mut inv = inventory(&[(Item::Flint, 1)]);
        let result = remove_item(&mut inv, Item::Flint, 2);
        assert!(matches!(
            result,
            Err(AgentError::InsufficientItem {
                requested: 2,
                available: 1,
                ..
            })
        ));
        assert_eq!(count(&inv, Item::Flint), 1);
    }

    #[test]
    fn craft_spear_consumes_inputs() {
        let mut inv = inventory(&[(Item::Wood, 1), (Item::Flint, 1)]);
        assert!(can_craft(&inv, Recipe::Spear));
        assert!(craft(&mut inv, Recipe::Spear).is_ok());
        assert_eq!(inv, inventory(&[(Item::Spear, 1)]));
    }

    #[test]
    fn craft_without_flint_changes_nothing() {
        let mut inv = inventory(&[(Item::Wood, 2)]);
        let before = inv.clone();
        assert!(!can_craft(&inv, Recipe::Spear));
        assert!(craft(&mut inv, Recipe::Spear).is_err());
        assert_eq!(inv, before);
    }

    #[test]
    fn swap_conserves_both_items() {
        let mut a = inventory(&[(Item::Food, 1)]);
        let mut b = inventory(&[(Item::Flint, 2)]);
        assert!(swap_one(&mut a, &mut b, Item::Food, Item::Flint).is_ok());
        assert_eq!(a, inventory(&[(Item::Flint, 1)]));
        assert_eq!(b, inventory(&[(Item::Flint, 1), (Item::Food, 1)]));
        assert_eq!(total_of([&a, &b], Item::Food), 1);
        assert_eq!(total_of([&a, &b], Item::Flint), 2);
    }

    #[test]
    fn swap_fails_atomically_when_partner_lacks_request() {
        let mut a = inventory(&[(Item::Food, 1)]);
        let mut b = inventory(&[(Item::Wood, 1)]);
        let (a0, b0) = (a.clone(), b.clone());
        assert!(swap_one(&mut a, &mut b, Item::Food, Item::Flint).is_err());
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }
}

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Candidate;
use crate::presenter;
use crate::store::{OrderStore, StorageBackend};

pub fn run<C: StorageBackend, D: StorageBackend>(
    store: &mut OrderStore<C, D>,
    candidate: &Candidate,
) -> Result<CmdResult> {
    let order = store.add(candidate)?;
    let (summary, _) = presenter::describe(&order.meal, store.catalog());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Order #{} added for {}: {} at {}",
        store.len(),
        order.submitter,
        summary,
        store.catalog().restaurant_label(order.kind())
    )));
    result.note_durability(store.durability());
    Ok(result.with_affected_orders(vec![order]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::commands::MessageLevel;
    use crate::model::{DeliMeal, KebabMeal};
    use crate::store::{MemBackend, Tiered};

    fn store() -> OrderStore<MemBackend, MemBackend> {
        OrderStore::open(
            Tiered::new(MemBackend::new(), MemBackend::new()),
            Catalog::default(),
            "default",
        )
    }

    #[test]
    fn test_adds_and_reports() {
        let mut store = store();
        let result = run(&mut store, &Candidate::numbered("Anna", "12")).unwrap();
        assert_eq!(result.affected_orders.len(), 1);
        assert_eq!(
            result.messages[0].content,
            "Order #1 added for Anna: No. 12 at YamYam"
        );

        let result = run(
            &mut store,
            &Candidate::kebab("Jörg", KebabMeal::new("aldi", "box").with_box_style("salat")),
        )
        .unwrap();
        assert_eq!(
            result.messages[0].content,
            "Order #2 added for Jörg: Dönerbox (with salad) (Aldi Döner) at Döner"
        );
    }

    #[test]
    fn test_invalid_order_is_an_error() {
        let mut store = store();
        assert!(run(&mut store, &Candidate::deli("Anna", DeliMeal::new("Salat"))).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_warns_when_durable_write_fails() {
        let mut store = store();
        store.backend().durable().set_simulate_write_error(true);
        let result = run(&mut store, &Candidate::numbered("Anna", "1")).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[1].level, MessageLevel::Warning);
    }
}

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-flight request guard keyed by application id. A decision may only be
/// submitted while holding the ticket for its id; the ticket releases the id
/// on drop, including on the error path.
#[derive(Clone, Debug, Default)]
pub struct ProcessingGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ProcessingGuard {
    pub fn begin(&self, id: &str) -> Option<ProcessingTicket> {
        let mut in_flight = lock(&self.in_flight);
        if !in_flight.insert(id.to_string()) {
            return None;
        }
        Some(ProcessingTicket { id: id.to_string(), in_flight: Arc::clone(&self.in_flight) })
    }

    pub fn is_processing(&self, id: &str) -> bool {
        lock(&self.in_flight).contains(id)
    }
}

#[derive(Debug)]
pub struct ProcessingTicket {
    id: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for ProcessingTicket {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.id);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> std::sync::MutexGuard<'_, HashSet<String>> {
    match set.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::ProcessingGuard;

    #[test]
    fn second_ticket_for_same_id_is_refused_while_first_is_held() {
        let guard = ProcessingGuard::default();
        let ticket = guard.begin("app-77").expect("first ticket");

        assert!(guard.is_processing("app-77"));
        assert!(guard.begin("app-77").is_none());

        drop(ticket);
        assert!(!guard.is_processing("app-77"));
        assert!(guard.begin("app-77").is_some());
    }

    #[test]
    fn distinct_ids_do_not_block_each_other() {
        let guard = ProcessingGuard::default();
        let _driver = guard.begin("app-77").expect("driver ticket");
        let _vehicle = guard.begin("veh-31").expect("vehicle ticket");
        assert!(guard.is_processing("app-77"));
        assert!(guard.is_processing("veh-31"));
    }

    #[test]
    fn clones_share_the_same_in_flight_set() {
        let guard = ProcessingGuard::default();
        let clone = guard.clone();
        let _ticket = guard.begin("app-77").expect("ticket");
        assert!(clone.begin("app-77").is_none());
    }
}

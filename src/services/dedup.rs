//! Duplicate removal for merged service lists

use crate::domain::{ServiceEntry, ServiceLists};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DedupStrategy {
    /// Hospitals collapse on identical `name`, services on identical `phone`
    /// (two missing phones count as identical).
    #[default]
    Exact,
    /// Two entries are the same facility only when they sit within
    /// `threshold_meters` of each other and share a case-insensitive name or a
    /// non-empty phone.
    Proximity { threshold_meters: f64 },
}

impl DedupStrategy {
    pub fn apply(&self, lists: ServiceLists) -> ServiceLists {
        match *self {
            DedupStrategy::Exact => ServiceLists {
                hospitals: keep_first(lists.hospitals, |a, b| a.name == b.name),
                emergency_services: keep_first(lists.emergency_services, |a, b| {
                    a.phone == b.phone
                }),
            },
            DedupStrategy::Proximity { threshold_meters } => {
                let same = |a: &ServiceEntry, b: &ServiceEntry| {
                    same_facility(a, b, threshold_meters)
                };
                ServiceLists {
                    hospitals: keep_first(lists.hospitals, same),
                    emergency_services: keep_first(lists.emergency_services, same),
                }
            }
        }
    }
}

/// Order-preserving: an entry survives unless an earlier survivor matches it.
fn keep_first<F>(entries: Vec<ServiceEntry>, is_duplicate: F) -> Vec<ServiceEntry>
where
    F: Fn(&ServiceEntry, &ServiceEntry) -> bool,
{
    let mut kept: Vec<ServiceEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !kept.iter().any(|k| is_duplicate(k, &entry)) {
            kept.push(entry);
        }
    }
    kept
}

fn same_facility(a: &ServiceEntry, b: &ServiceEntry, threshold_meters: f64) -> bool {
    let distance_m = a.coordinate().distance_km(&b.coordinate()) * 1000.0;
    if distance_m > threshold_meters {
        return false;
    }

    let same_name = a.name.trim().to_lowercase() == b.name.trim().to_lowercase();
    let same_phone = match (&a.phone, &b.phone) {
        (Some(x), Some(y)) => !x.trim().is_empty() && x.trim() == y.trim(),
        _ => false,
    };
    same_name || same_phone
}

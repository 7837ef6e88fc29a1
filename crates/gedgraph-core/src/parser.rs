//! Record parser: the level-driven state machine
//!
//! Each tokenized line is applied to the current [`ParseState`], which is
//! returned updated. Level-0 lines open or close records, level-1 lines fill
//! in the open record, and level-2 lines matter only for the birth date.

use crate::family::Family;
use crate::graph::{export_graph, GraphExport};
use crate::individual::{extract_year, normalize_name, Individual, Sex};
use crate::registry::{Handle, Registry};
use crate::relation::{derive_edges, Edge};
use crate::tokenizer::{strip_xref, GedcomLine};

/// Tags understood by the parser
pub mod tags {
    pub const INDIVIDUAL: &str = "INDI";
    pub const FAMILY: &str = "FAM";
    pub const NAME: &str = "NAME";
    pub const SEX: &str = "SEX";
    pub const HUSBAND: &str = "HUSB";
    pub const WIFE: &str = "WIFE";
    pub const CHILD: &str = "CHIL";
    pub const SPOUSE_IN_FAMILY: &str = "FAMS";
    pub const CHILD_IN_FAMILY: &str = "FAMC";
    pub const BIRTH: &str = "BIRT";
    pub const DATE: &str = "DATE";
}

/// Which record, if any, is accepting level-1 and level-2 lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    Idle,
    Individual {
        handle: Handle,
        /// Set by `BIRT`, cleared by the next `DATE` or level-0/1 line
        awaiting_birth_date: bool,
    },
    Family {
        handle: Handle,
    },
}

/// Individuals and families collected from one input
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub individuals: Registry<Individual>,
    pub families: Registry<Family>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parent-child and spouse edges for every family
    pub fn derive_edges(&self) -> Vec<Edge> {
        derive_edges(&self.families)
    }

    /// Nodes for every individual plus the derived connections
    pub fn to_graph(&self) -> GraphExport {
        export_graph(&self.individuals, self.derive_edges())
    }
}

/// Apply one line and return the next state
pub fn step(state: ParseState, line: &GedcomLine<'_>, records: &mut RecordSet) -> ParseState {
    match line.level {
        0 => start_record(line, records),
        1 => apply_record_line(state, line, records),
        2 => apply_detail_line(state, line, records),
        _ => state,
    }
}

fn start_record(line: &GedcomLine<'_>, records: &mut RecordSet) -> ParseState {
    let id = strip_xref(line.id_or_tag());
    match line.second() {
        Some(tags::INDIVIDUAL) => {
            let handle = records.individuals.insert(id, Individual::new(id));
            tracing::debug!("Created individual: {}", id);
            ParseState::Individual {
                handle,
                awaiting_birth_date: false,
            }
        }
        Some(tags::FAMILY) => {
            let handle = records.families.insert(id, Family::new(id));
            tracing::debug!("Created family: {}", id);
            ParseState::Family { handle }
        }
        _ => ParseState::Idle,
    }
}

fn apply_record_line(
    state: ParseState,
    line: &GedcomLine<'_>,
    records: &mut RecordSet,
) -> ParseState {
    match state {
        ParseState::Idle => ParseState::Idle,
        ParseState::Individual { handle, .. } => {
            let Some(individual) = records.individuals.get_mut(handle) else {
                return ParseState::Idle;
            };
            let awaiting_birth_date = apply_individual_line(individual, line);
            ParseState::Individual {
                handle,
                awaiting_birth_date,
            }
        }
        ParseState::Family { handle } => {
            if let Some(family) = records.families.get_mut(handle) {
                apply_family_line(family, line);
            }
            state
        }
    }
}

/// Returns whether a birth date is now expected
fn apply_individual_line(individual: &mut Individual, line: &GedcomLine<'_>) -> bool {
    match line.id_or_tag() {
        tags::NAME => {
            if let Some(name) = normalize_name(&line.value()) {
                individual.name = Some(name);
            }
        }
        tags::SEX => {
            let value = line.value();
            if !value.is_empty() {
                individual.sex = Sex::from(value);
            }
        }
        tags::SPOUSE_IN_FAMILY => push_reference(&mut individual.spouse_in, line),
        tags::CHILD_IN_FAMILY => push_reference(&mut individual.child_in, line),
        tags::BIRTH => return true,
        _ => {}
    }
    false
}

fn apply_family_line(family: &mut Family, line: &GedcomLine<'_>) {
    match line.id_or_tag() {
        tags::HUSBAND | tags::WIFE => push_reference(&mut family.spouses, line),
        tags::CHILD => push_reference(&mut family.children, line),
        _ => {}
    }
}

fn push_reference(list: &mut Vec<String>, line: &GedcomLine<'_>) {
    let value = line.value();
    let id = strip_xref(&value);
    if !id.is_empty() {
        list.push(id.to_string());
    }
}

fn apply_detail_line(
    state: ParseState,
    line: &GedcomLine<'_>,
    records: &mut RecordSet,
) -> ParseState {
    match state {
        ParseState::Individual {
            handle,
            awaiting_birth_date: true,
        } if line.id_or_tag() == tags::DATE => {
            if let (Some(individual), Some(year)) = (
                records.individuals.get_mut(handle),
                extract_year(line.value_tokens()),
            ) {
                individual.birth_year = Some(year);
            }
            ParseState::Individual {
                handle,
                awaiting_birth_date: false,
            }
        }
        other => other,
    }
}

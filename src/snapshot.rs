//! Serialized compilation snapshots.
//!
//! The host build pipeline (or the CLI) hands the generator one snapshot per
//! pass: the semantic model of the involved types plus the observation
//! call-sites with their selector source text. Selector text is parsed here;
//! a selector that does not fit the supported grammar drops its invocation,
//! which matches the silent-skip contract for unsupported expressions.

use rxwire_binder::{Compilation, CompilationId, TypeSymbol};
use rxwire_common::CallerLocation;
use rxwire_syntax::{Argument, InvocationSite, parse_selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One argument at a snapshot call-site.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SnapshotArgument {
    /// A selector lambda, as source text (`"x => x.Child.Name"`).
    Selector { text: String },
    /// A combining or converter function; passed through, never inspected.
    Function { text: String },
    /// A scheduler reference on binding forms.
    Scheduler { text: String },
    /// Anything else.
    Other { text: String },
}

/// One call-site in the snapshot, with the semantic facts the host resolved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotInvocation {
    pub method_name: String,
    pub declaring_type_name: String,
    pub source_type_name: String,
    pub return_type_name: String,
    #[serde(default)]
    pub target_type_name: Option<String>,
    #[serde(default)]
    pub arguments: Vec<SnapshotArgument>,
    pub location: CallerLocation,
}

/// A whole compilation snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilationSnapshot {
    pub compilation_id: u64,
    #[serde(default)]
    pub types: Vec<TypeSymbol>,
    #[serde(default)]
    pub invocations: Vec<SnapshotInvocation>,
}

/// The loaded form of a snapshot: a semantic model plus parsed call-sites.
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub compilation: Compilation,
    pub sites: Vec<InvocationSite>,
    /// Invocations dropped because a selector did not parse.
    pub unparsed_invocations: usize,
}

impl CompilationSnapshot {
    /// Parse selector text and build the semantic model.
    pub fn load(self) -> LoadedSnapshot {
        let compilation = Compilation::new(CompilationId(self.compilation_id), self.types);
        let mut sites = Vec::with_capacity(self.invocations.len());
        let mut unparsed_invocations = 0;

        'invocations: for invocation in self.invocations {
            let mut arguments = Vec::with_capacity(invocation.arguments.len());
            for argument in &invocation.arguments {
                let parsed = match argument {
                    SnapshotArgument::Selector { text } => match parse_selector(text) {
                        Ok(lambda) => Argument::Selector(lambda),
                        Err(error) => {
                            debug!(
                                selector = %text,
                                %error,
                                location = %invocation.location,
                                "dropping invocation: selector does not parse"
                            );
                            unparsed_invocations += 1;
                            continue 'invocations;
                        }
                    },
                    SnapshotArgument::Function { text } => Argument::Function { text: text.clone() },
                    SnapshotArgument::Scheduler { text } => {
                        Argument::Scheduler { text: text.clone() }
                    }
                    SnapshotArgument::Other { text } => Argument::Other { text: text.clone() },
                };
                arguments.push(parsed);
            }
            sites.push(InvocationSite {
                method_name: invocation.method_name,
                declaring_type_name: invocation.declaring_type_name,
                source_type_name: invocation.source_type_name,
                return_type_name: invocation.return_type_name,
                target_type_name: invocation.target_type_name,
                arguments,
                location: invocation.location,
            });
        }

        LoadedSnapshot {
            compilation,
            sites,
            unparsed_invocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(selector: &str) -> SnapshotInvocation {
        SnapshotInvocation {
            method_name: "observe".to_string(),
            declaring_type_name: "rxwire::runtime::ObserveExtensions".to_string(),
            source_type_name: "demo::ViewModel".to_string(),
            return_type_name: "String".to_string(),
            target_type_name: None,
            arguments: vec![SnapshotArgument::Selector {
                text: selector.to_string(),
            }],
            location: CallerLocation::new("app.rs", 1, 1),
        }
    }

    #[test]
    fn test_load_parses_selectors() {
        let snapshot = CompilationSnapshot {
            compilation_id: 1,
            types: vec![],
            invocations: vec![invocation("x => x.Name")],
        };
        let loaded = snapshot.load();
        assert_eq!(loaded.sites.len(), 1);
        assert_eq!(loaded.unparsed_invocations, 0);
        assert_eq!(loaded.sites[0].selectors().count(), 1);
    }

    #[test]
    fn test_unparseable_selector_drops_invocation() {
        let snapshot = CompilationSnapshot {
            compilation_id: 1,
            types: vec![],
            invocations: vec![invocation("x => x.A + x.B"), invocation("x => x.Name")],
        };
        let loaded = snapshot.load();
        assert_eq!(loaded.sites.len(), 1);
        assert_eq!(loaded.unparsed_invocations, 1);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = CompilationSnapshot {
            compilation_id: 9,
            types: vec![],
            invocations: vec![invocation("x => x.Name")],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: CompilationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.compilation_id, 9);
        assert_eq!(back.invocations.len(), 1);
    }
}

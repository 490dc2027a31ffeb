//! Dispatch and registration source emission.
//!
//! One file per dispatch shape plus one registration file. The text depends
//! only on the descriptor set: groups are emitted in signature order and
//! call-sites in caller-location order, so a fixed set of descriptors always
//! produces byte-identical output.

use crate::dispatch::{DispatchGroup, ShapeSignature, group_invocations};
use crate::output::OutputSink;
use crate::strategy::{FusedStrategy, adapter_function, select_strategy};
use crate::writer::SourceWriter;
use rxwire_binder::{Compilation, WellKnownSymbols};
use rxwire_checker::{
    BindingInvocationDescriptor, ClassifiedInvocation, InvocationDescriptor, PathSegment,
    PropertyPath,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the generated registration file.
pub const REGISTRATION_FILE: &str = "registrations.g.rs";

/// What one emission pass produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Generated files, including the registration file.
    pub files: usize,
    /// Distinct dispatch shapes.
    pub shapes: usize,
    /// Distinct source types in the registration table.
    pub registered_types: usize,
}

/// Emits dispatch functions for classified invocations.
pub struct Emitter<'a> {
    compilation: &'a Compilation,
    well_known: &'a WellKnownSymbols,
}

impl<'a> Emitter<'a> {
    pub fn new(compilation: &'a Compilation, well_known: &'a WellKnownSymbols) -> Self {
        Emitter {
            compilation,
            well_known,
        }
    }

    /// Group, select strategies, and emit everything into `sink`.
    pub fn emit_all(
        &self,
        invocations: &[ClassifiedInvocation],
        sink: &mut dyn OutputSink,
    ) -> EmitSummary {
        let groups = group_invocations(invocations);
        if groups.is_empty() {
            return EmitSummary::default();
        }

        let mut registrations: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for group in &groups {
            let text = self.emit_group(group);
            sink.add_source(&group.signature.file_name(), text);
            registrations
                .entry(group.signature.source_type_name.clone())
                .or_default()
                .push(group.signature.function_name());
        }

        sink.add_source(REGISTRATION_FILE, emit_registrations(&registrations));
        let summary = EmitSummary {
            files: groups.len() + 1,
            shapes: groups.len(),
            registered_types: registrations.len(),
        };
        debug!(?summary, "emission complete");
        summary
    }

    fn emit_group(&self, group: &DispatchGroup) -> String {
        let signature = &group.signature;
        let mut w = SourceWriter::new();
        w.write_line("// <auto-generated/>");
        w.write_line(&format!(
            "// rxwire dispatch: `{}` on `{}`.",
            signature.method_name, signature.source_type_name
        ));
        w.blank_line();
        w.write_line("use rxwire::runtime::*;");
        w.blank_line();
        w.write_line(&format!(
            "/// Dispatches `{}` call-sites on `{}` with path shape {:?}.",
            signature.method_name, signature.source_type_name, signature.path_depths
        ));
        w.block(&self.function_header(signature), |w| {
            for invocation in &group.invocations {
                self.emit_site_branch(w, invocation);
            }
            w.write_line(
                "panic!(\"no generated dispatch for {caller_file}:{caller_line}:{caller_column}\");",
            );
        });
        w.finish()
    }

    fn function_header(&self, signature: &ShapeSignature) -> String {
        let mut params = vec![format!("source: &{}", signature.source_type_name)];
        if let Some(binding) = &signature.binding {
            params.push(format!("target: &mut {}", binding.target_type_name));
            if binding.has_converter {
                params.push(format!(
                    "converter: impl Fn({}) -> {} + Clone + 'static",
                    signature.path_leaf_types[0], binding.target_leaf_type
                ));
            }
            if binding.has_scheduler {
                params.push("scheduler: SchedulerRef".to_string());
            }
        } else if signature.has_combiner {
            params.push(format!(
                "selector: impl Fn({}) -> {} + Clone + 'static",
                signature.path_leaf_types.join(", "),
                signature.return_type_name
            ));
        }
        params.push("caller_file: &str".to_string());
        params.push("caller_line: u32".to_string());
        params.push("caller_column: u32".to_string());

        let return_type = if signature.binding.is_some() {
            "BindingHandle".to_string()
        } else {
            format!("Observation<{}>", signature.return_type_name)
        };
        format!(
            "pub fn {}({}) -> {}",
            signature.function_name(),
            params.join(", "),
            return_type
        )
    }

    fn emit_site_branch(&self, w: &mut SourceWriter, invocation: &ClassifiedInvocation) {
        let descriptor = invocation.descriptor();
        let location = &descriptor.caller_location;
        let paths: Vec<String> = descriptor.paths().iter().map(PropertyPath::dotted).collect();
        w.write_line(&format!("// {} ({})", location, paths.join(", ")));
        let condition = format!(
            "if caller_file == {:?} && caller_line == {} && caller_column == {}",
            location.file, location.line, location.column
        );
        w.block(&condition, |w| match invocation {
            ClassifiedInvocation::Observe(descriptor) => self.emit_observe_body(w, descriptor),
            ClassifiedInvocation::Binding(binding) => self.emit_binding_body(w, binding),
        });
    }

    fn emit_observe_body(&self, w: &mut SourceWriter, descriptor: &InvocationDescriptor) {
        match select_strategy(descriptor) {
            FusedStrategy::Single(_) => {
                let expr = self.path_observable(&descriptor.paths()[0], "source");
                // A combining function on a single path is a projection.
                if descriptor.has_combiner {
                    w.write_line(&format!("return {expr}.map(selector.clone());"));
                } else {
                    w.write_line(&format!("return {expr};"));
                }
            }
            FusedStrategy::Merge(_) => {
                let names = self.emit_path_lets(w, descriptor);
                w.write_line(&format!("return merge(vec![{}]);", names.join(", ")));
            }
            FusedStrategy::CombineLatest(_) => {
                let names = self.emit_path_lets(w, descriptor);
                w.write_line(&format!(
                    "return combine_latest{}({}, selector.clone());",
                    names.len(),
                    names.join(", ")
                ));
            }
        }
    }

    fn emit_path_lets(&self, w: &mut SourceWriter, descriptor: &InvocationDescriptor) -> Vec<String> {
        let mut names = Vec::with_capacity(descriptor.paths().len());
        for (index, path) in descriptor.paths().iter().enumerate() {
            let name = format!("s{index}");
            let expr = self.path_observable(path, "source");
            w.write_line(&format!("let {name} = {expr};"));
            names.push(name);
        }
        names
    }

    fn emit_binding_body(&self, w: &mut SourceWriter, binding: &BindingInvocationDescriptor) {
        let source_expr = self.path_observable(&binding.base.paths()[0], "source");
        w.write_line(&format!("let source_values = {source_expr};"));
        if binding.has_converter {
            w.write_line("let source_values = source_values.map(converter.clone());");
        }
        if binding.has_scheduler {
            w.write_line("let source_values = source_values.observe_on(scheduler.clone());");
        }

        let target_setter = setter_closure(&binding.target_type_name, &binding.target_path, "t");
        if binding.is_two_way {
            let target_expr = self.path_observable(&binding.target_path, "target");
            w.write_line(&format!("let target_values = {target_expr};"));
            let source_path = &binding.base.paths()[0];
            let source_setter =
                setter_closure(&binding.base.source_type_name, source_path, "s");
            w.write_line(&format!(
                "return bind_two_way(source_values, target_values, {source_setter}, {target_setter});"
            ));
        } else {
            w.write_line(&format!(
                "return bind_one_way(source_values, target, {:?}, {target_setter});",
                binding.target_path.dotted()
            ));
        }
    }

    /// Build the observable expression for one path.
    ///
    /// Depth 1 is a direct subscription; deeper paths nest select+switch so a
    /// change anywhere along the chain resubscribes from that point down.
    /// Only the leaf subscription filters distinct values.
    fn path_observable(&self, path: &PropertyPath, root_expr: &str) -> String {
        self.path_observable_from(path.segments(), root_expr, 0)
    }

    fn path_observable_from(
        &self,
        segments: &[PathSegment],
        root_expr: &str,
        depth: usize,
    ) -> String {
        let segment = &segments[0];
        let adapter =
            adapter_function(self.compilation, self.well_known, &segment.declaring_type_name);
        let is_leaf = segments.len() == 1;
        let head = format!(
            "{adapter}({root_expr}, {name:?}, |s: &{decl}| s.{name}.clone(), {is_leaf})",
            name = segment.property_name,
            decl = segment.declaring_type_name,
        );
        if is_leaf {
            return head;
        }
        let var = format!("v{depth}");
        let inner = self.path_observable_from(&segments[1..], &var, depth + 1);
        format!(
            "{head}.select(move |{var}: &{ty}| {inner}).switch()",
            ty = segment.property_type_name
        )
    }
}

/// Closure assigning `value` through a dotted property path.
fn setter_closure(owner_type: &str, path: &PropertyPath, binding_name: &str) -> String {
    let leaf_type = &path.leaf().property_type_name;
    format!(
        "|{binding_name}: &mut {owner_type}, value: {leaf_type}| {binding_name}.{} = value",
        path.dotted()
    )
}

fn emit_registrations(registrations: &BTreeMap<String, Vec<String>>) -> String {
    let mut w = SourceWriter::new();
    w.write_line("// <auto-generated/>");
    w.write_line("// Registration table: one entry per source type with generated dispatch.");
    w.blank_line();
    w.write_line("use rxwire::runtime::ObservationRegistration;");
    w.blank_line();
    w.write_line("pub static OBSERVATION_REGISTRATIONS: &[ObservationRegistration] = &[");
    w.increase_indent();
    for (source_type, functions) in registrations {
        let mut functions = functions.clone();
        functions.sort();
        w.write_line("ObservationRegistration {");
        w.increase_indent();
        w.write_line(&format!("source_type: {source_type:?},"));
        let quoted: Vec<String> = functions.iter().map(|f| format!("{f:?}")).collect();
        w.write_line(&format!("dispatch_functions: &[{}],", quoted.join(", ")));
        w.decrease_indent();
        w.write_line("},");
    }
    w.decrease_indent();
    w.write_line("];");
    w.finish()
}

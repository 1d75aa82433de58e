use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, Type};

use super::util::{input_rows, json_to_nu, labeled};
use crate::ops;
use crate::ArchivePlugin;

pub struct Facets;

impl PluginCommand for Facets {
    type Plugin = ArchivePlugin;

    fn name(&self) -> &str {
        "archive facets"
    }

    fn description(&self) -> &str {
        "Distinct crime types, districts, statuses and years for filter choices"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::table(), Type::record())
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["facets", "choices", "distinct", "years", "districts"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "archive ingest --sample | archive facets | get years",
            description: "Incident years present in the catalog, most recent first",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &ArchivePlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let rows = input_rows(input);
        let json_val = ops::op_facets(&rows).map_err(|e| labeled(e, head))?;
        Ok(PipelineData::Value(json_to_nu(&json_val, head), None))
    }
}

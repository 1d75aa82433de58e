use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, ListStream, PipelineData, Signals, Signature, Type, Value,
};

use super::util::{input_rows, json_to_nu, labeled};
use crate::ops;
use crate::ArchivePlugin;

pub struct CaseId;

impl PluginCommand for CaseId {
    type Plugin = ArchivePlugin;

    fn name(&self) -> &str {
        "archive id"
    }

    fn description(&self) -> &str {
        "Append each case's bookmark identifier as an `_id` column"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::table(), Type::table())
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["id", "identifier", "bookmark", "key"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: "archive ingest --sample | archive id | select title _id",
            description: "Show the identifier used for bookmarks",
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
        let json_val = ops::op_case_ids(&rows).map_err(|e| labeled(e, head))?;

        match json_to_nu(&json_val, head) {
            Value::List { vals, .. } => {
                Ok(ListStream::new(vals.into_iter(), head, Signals::empty()).into())
            }
            other => Ok(PipelineData::Value(other, None)),
        }
    }
}

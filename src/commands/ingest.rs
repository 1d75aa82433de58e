use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, ListStream, PipelineData, Signals, Signature, Type, Value,
};

use super::util::{json_to_nu, labeled};
use crate::ops;
use crate::ArchivePlugin;

pub struct Ingest;

impl PluginCommand for Ingest {
    type Plugin = ArchivePlugin;

    fn name(&self) -> &str {
        "archive ingest"
    }

    fn description(&self) -> &str {
        "Parse published case-table text into normalized case records"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::String, Type::table()),
                (Type::String, Type::record()),
                (Type::Nothing, Type::table()),
            ])
            .switch(
                "report",
                "Return a record with the records and an ingest report",
                Some('r'),
            )
            .switch(
                "sample",
                "Ignore input and return the built-in sample cases",
                Some('s'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["csv", "parse", "cases", "archive", "import"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "open --raw cases.csv | archive ingest",
                description: "Normalize a downloaded case sheet",
                result: None,
            },
            Example {
                example: "http get --raw $url | archive ingest --report | get report",
                description: "Show how many rows were kept and which headers were ignored",
                result: None,
            },
            Example {
                example: "archive ingest --sample",
                description: "The sample dataset used when the sheet is unavailable",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &ArchivePlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let report: bool = call.has_flag("report")?;
        let sample: bool = call.has_flag("sample")?;

        let result = if sample {
            ops::op_sample()
        } else {
            let text = input.into_value(head)?.coerce_into_string()?;
            ops::op_ingest(&text).map(|v| if report { v } else { v["records"].clone() })
        };
        let json_val = result.map_err(|e| labeled(e, head))?;

        match json_to_nu(&json_val, head) {
            Value::List { vals, .. } => {
                Ok(ListStream::new(vals.into_iter(), head, Signals::empty()).into())
            }
            other => Ok(PipelineData::Value(other, None)),
        }
    }
}

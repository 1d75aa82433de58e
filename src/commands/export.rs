use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type, Value,
};

use super::util::{json_to_nu, labeled, nu_to_json};
use crate::algo::export::ExportOptions;
use crate::ops;
use crate::ArchivePlugin;

pub struct Export;

impl PluginCommand for Export {
    type Plugin = ArchivePlugin;

    fn name(&self) -> &str {
        "archive export"
    }

    fn description(&self) -> &str {
        "Render one case record as a paginated plain-text case file"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::record(), Type::String),
                (Type::record(), Type::record()),
            ])
            .named(
                "width",
                SyntaxShape::Int,
                "Line width in characters (default: 80)",
                Some('w'),
            )
            .named(
                "page-lines",
                SyntaxShape::Int,
                "Lines per page including the footer (default: 54)",
                Some('p'),
            )
            .switch(
                "with-name",
                "Return a record with file_name, page_count and text",
                Some('n'),
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["export", "document", "pdf", "print", "case file"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "archive ingest --sample | first | archive export",
                description: "Case file text for the first sample case",
                result: None,
            },
            Example {
                example: "$case | archive export --with-name | save -f $in.file_name",
                description: "Export with the suggested file name",
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
        let defaults = ExportOptions::default();
        let options = ExportOptions {
            line_width: call
                .get_flag::<i64>("width")?
                .map(|w| w.max(0) as usize)
                .unwrap_or(defaults.line_width),
            lines_per_page: call
                .get_flag::<i64>("page-lines")?
                .map(|n| n.max(0) as usize)
                .unwrap_or(defaults.lines_per_page),
        };
        let with_name: bool = call.has_flag("with-name")?;

        let row = input.into_value(head)?;
        if !matches!(row, Value::Record { .. }) {
            return Err(LabeledError::new("archive export expects a single case record")
                .with_label("pipe one row, e.g. `| first`", head));
        }

        let json_val = ops::op_export(&nu_to_json(&row), &options).map_err(|e| labeled(e, head))?;
        if with_name {
            return Ok(PipelineData::Value(json_to_nu(&json_val, head), None));
        }
        let text = json_val["text"].as_str().unwrap_or_default().to_string();
        Ok(PipelineData::Value(Value::string(text, head), None))
    }
}

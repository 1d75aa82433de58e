use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, ListStream, PipelineData, Signals, Signature, SyntaxShape,
    Type, Value,
};

use super::util::{input_rows, json_to_nu, labeled};
use crate::algo::filter::FilterState;
use crate::ops;
use crate::ArchivePlugin;

pub struct Filter;

impl PluginCommand for Filter {
    type Plugin = ArchivePlugin;

    fn name(&self) -> &str {
        "archive filter"
    }

    fn description(&self) -> &str {
        "Keep case records matching every given filter, in their original order"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::table(), Type::table())
            .named(
                "query",
                SyntaxShape::String,
                "Case-insensitive text matched against title, subject name and summary",
                Some('q'),
            )
            .named("crime-type", SyntaxShape::String, "Exact crime type", Some('c'))
            .named("district", SyntaxShape::String, "Exact district", Some('d'))
            .named("status", SyntaxShape::String, "Exact case status", Some('s'))
            .named("year", SyntaxShape::String, "Incident year, e.g. 2018", Some('y'))
            .named(
                "month",
                SyntaxShape::String,
                "Incident month as two digits, e.g. 03",
                Some('m'),
            )
            .named(
                "from",
                SyntaxShape::String,
                "Earliest incident date (inclusive)",
                None,
            )
            .named("to", SyntaxShape::String, "Latest incident date (inclusive)", None)
            .switch("saved-only", "Only bookmarked cases", None)
            .named(
                "store",
                SyntaxShape::String,
                "Path to the SQLite archive store holding bookmarks",
                None,
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["filter", "search", "cases", "district", "crime", "bookmark"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "archive ingest --sample | archive filter --district Dhaka --year 2018",
                description: "Cases from Dhaka in 2018",
                result: None,
            },
            Example {
                example: "$cases | archive filter --query fraud",
                description: "Free-text search",
                result: None,
            },
            Example {
                example: "$cases | archive filter --saved-only --store archive.db",
                description: "Only bookmarked cases",
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
        let state = FilterState {
            query: call.get_flag::<String>("query")?.unwrap_or_default(),
            crime_type: call.get_flag("crime-type")?,
            district: call.get_flag("district")?,
            status: call.get_flag("status")?,
            year: call.get_flag("year")?,
            month: call.get_flag("month")?,
            date_from: call.get_flag("from")?,
            date_to: call.get_flag("to")?,
            saved_only: call.has_flag("saved-only")?,
        };
        let store: Option<String> = call.get_flag("store")?;

        if state.saved_only && store.is_none() {
            return Err(LabeledError::new("--saved-only needs a bookmark store")
                .with_label("pass --store <path>", head));
        }

        let rows = input_rows(input);
        let saved = ops::load_saved(store.as_deref()).map_err(|e| labeled(e, head))?;
        let json_val = ops::op_filter(&rows, &state, &saved).map_err(|e| labeled(e, head))?;

        match json_to_nu(&json_val, head) {
            Value::List { vals, .. } => {
                Ok(ListStream::new(vals.into_iter(), head, Signals::empty()).into())
            }
            other => Ok(PipelineData::Value(other, None)),
        }
    }
}

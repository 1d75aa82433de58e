use nu_plugin::{serve_plugin, MsgPackSerializer};
use nu_plugin_case_archive::ArchivePlugin;

fn main() {
    serve_plugin(&ArchivePlugin, MsgPackSerializer {})
}

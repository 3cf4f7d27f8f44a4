use std::path::PathBuf;

use tracing::info;

use crate::client::{GenerationService, ResponsesRequest, TextOptions};
use crate::config::Config;
use crate::decoder::decode;
use crate::error::{ForgeError, Result};
use crate::prompt::{ModuleLayout, build_prompt};
use crate::publish::{ChangePublisher, PublishOutcome, Vcs};
use crate::request::GenerationRequest;
use crate::schema::output_format;
use crate::trace::{TraceRecord, TraceRecorder};
use crate::writer::{AllowList, PathGuardedWriter};

/// What a successful run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub module_root: String,
    pub written: Vec<PathBuf>,
    pub trace: Option<PathBuf>,
    pub publish: Option<PublishOutcome>,
}

/// Prompt, request, decode, write, trace and optionally commit, in that order.
pub struct Pipeline<'a> {
    config: &'a Config,
    service: &'a dyn GenerationService,
    vcs: Option<&'a dyn Vcs>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, service: &'a dyn GenerationService) -> Self {
        Self {
            config,
            service,
            vcs: None,
        }
    }

    pub fn with_vcs(mut self, vcs: &'a dyn Vcs) -> Self {
        self.vcs = Some(vcs);
        self
    }

    pub fn allow_list(&self, layout: &ModuleLayout) -> AllowList {
        let extra = self.config.output.extra_prefixes.iter().cloned();
        AllowList::new(std::iter::once(layout.allow_prefix()).chain(extra))
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<RunReport> {
        let output = &self.config.output;
        if self.config.publish.enabled && self.vcs.is_none() {
            return Err(ForgeError::Configuration(
                "publishing is enabled but no version control backend was provided".into(),
            ));
        }

        let layout = ModuleLayout::new(request, output);
        let recorder = TraceRecorder::new(&output.root, output.trace_dir.as_str());
        // Dropped on every early return below, which writes the trace.
        let mut trace = recorder.guard(TraceRecord::from_request(request));

        let responses_request = ResponsesRequest {
            model: self.config.service.model.clone(),
            input: build_prompt(request, &layout, &self.config.rules, output.encoding),
            max_output_tokens: self.config.service.max_output_tokens,
            text: TextOptions {
                format: output_format(output.schema_mode, output.encoding),
            },
        };
        info!(
            issue = request.identifier(),
            module = %layout.name,
            root = %layout.root,
            mode = %output.schema_mode,
            encoding = %output.encoding,
            "generating module"
        );

        let envelope = self.service.generate(&responses_request).await?;
        let files = decode(&envelope, output.schema_mode, output.encoding)?;

        let writer = PathGuardedWriter::new(&output.root, self.allow_list(&layout));
        let written = writer.write_all(&files)?;
        let trace_path = trace.flush();

        let publish = match self.vcs {
            Some(vcs) if self.config.publish.enabled => {
                let mut paths = written.clone();
                paths.extend(trace_path.iter().cloned());
                let publisher = ChangePublisher::new(&self.config.publish);
                Some(publisher.publish(vcs, &paths, request.identifier())?)
            }
            _ => None,
        };

        Ok(RunReport {
            module_root: layout.root,
            written,
            trace: trace_path,
            publish,
        })
    }
}

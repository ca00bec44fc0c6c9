//! Cross-stage tests for the answering pipeline.

mod pipeline_scenarios;

// Pipelines: end-to-end flows that tie catalog, OCR and matching together.

pub mod lookup;

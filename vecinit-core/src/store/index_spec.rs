use super::error::{Error, Result};
use mongodb::bson::{self, doc, Document};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Similarity {
    Cosine,
    Euclidean,
    DotProduct,
}

impl Similarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Similarity::Cosine => "cosine",
            Similarity::Euclidean => "euclidean",
            Similarity::DotProduct => "dotProduct",
        }
    }
}

/// A vector-search index over a single embedding field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub path: String,
    pub num_dimensions: u32,
    pub similarity: Similarity,
}

impl Default for IndexSpec {
    fn default() -> Self {
        IndexSpec {
            name: "vector_index".to_string(),
            path: "embedding".to_string(),
            num_dimensions: 1536,
            similarity: Similarity::Cosine,
        }
    }
}

// region:   --- definition wire format

#[derive(Deserialize)]
struct Definition {
    fields: Vec<Field>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Field {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    #[serde(default)]
    num_dimensions: Option<u32>,
    #[serde(default)]
    similarity: Option<Similarity>,
}

// endregion: --- definition wire format

impl IndexSpec {
    /// The `vectorSearch` index definition document.
    pub fn definition(&self) -> Document {
        doc! {
            "fields": [
                {
                    "type": "vector",
                    "path": self.path.as_str(),
                    "numDimensions": i64::from(self.num_dimensions),
                    "similarity": self.similarity.as_str(),
                }
            ]
        }
    }

    /// Reads back the vector field at `path`, or the first vector field when
    /// no vector field sits at `path`.
    pub fn from_definition(name: &str, path: &str, definition: &Document) -> Result<Self> {
        let def: Definition =
            bson::from_document(definition.clone()).map_err(|e| Error::MalformedReply {
                op: "index definition",
                cause: e.to_string(),
            })?;
        let mut vectors: Vec<Field> = def
            .fields
            .into_iter()
            .filter(|f| f.kind == "vector")
            .collect();
        if vectors.is_empty() {
            return Err(Error::NoVectorField(name.to_string()));
        }
        let pos = vectors.iter().position(|f| f.path == path).unwrap_or(0);
        let field = vectors.swap_remove(pos);
        let (Some(num_dimensions), Some(similarity)) = (field.num_dimensions, field.similarity)
        else {
            return Err(Error::MalformedReply {
                op: "index definition",
                cause: format!("vector field '{}' lacks numDimensions or similarity", field.path),
            });
        };
        Ok(IndexSpec {
            name: name.to_string(),
            path: field.path,
            num_dimensions,
            similarity,
        })
    }
}

// endregion: --- Test

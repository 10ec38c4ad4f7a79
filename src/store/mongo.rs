//! MongoDB storage backend

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;

use crate::types::{Song, SongId};
use crate::{Error, Result};

use super::SongStore;

/// MongoDB-backed song store
///
/// Documents are stored as raw BSON; the application `id` field is queried
/// directly and is unrelated to the `_id` ObjectId Mongo assigns on insert.
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection::<Document>(collection);
        Ok(Self { collection })
    }
}

#[async_trait]
impl SongStore for MongoStore {
    async fn count(&self) -> Result<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    async fn list(&self) -> Result<Vec<Song>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(document_to_song).collect()
    }

    async fn find(&self, id: SongId) -> Result<Option<Song>> {
        let document = self.collection.find_one(doc! { "id": id }).await?;
        document.map(document_to_song).transpose()
    }

    async fn insert(&self, song: Song) -> Result<String> {
        let document = mongodb::bson::to_document(&song)?;
        let result = self.collection.insert_one(document).await?;
        Ok(inserted_id_string(result.inserted_id))
    }

    async fn delete(&self, id: SongId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    async fn replace_all(&self, songs: Vec<Song>) -> Result<usize> {
        self.collection.drop().await?;

        if songs.is_empty() {
            return Ok(0);
        }

        let documents = songs
            .iter()
            .map(mongodb::bson::to_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let result = self.collection.insert_many(documents).await?;
        Ok(result.inserted_ids.len())
    }
}

/// Render a store-assigned identifier as a plain string
fn inserted_id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

fn document_to_song(document: Document) -> Result<Song> {
    let value = bson_to_json(Bson::Document(document));
    serde_json::from_value(value)
        .map_err(|e| Error::invalid_document(format!("stored document is not a song: {e}")))
}

/// Convert BSON to JSON, rendering ObjectIds as plain hex strings.
///
/// Plain scalars pass through unchanged (relaxed extended JSON). ObjectIds
/// are intercepted wherever they appear, nested documents and arrays
/// included, so clients never see `{"$oid": ...}` envelopes.
fn bson_to_json(bson: Bson) -> Value {
    match bson {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn object_ids_encode_as_hex_strings() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "id": 1_i64, "title": "A" };

        let value = bson_to_json(Bson::Document(document));
        assert_eq!(value["_id"], json!(oid.to_hex()));
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["title"], json!("A"));
    }

    #[test]
    fn nested_object_ids_encode_as_hex_strings() {
        let oid = ObjectId::new();
        let document = doc! { "refs": [ { "ref": oid } ] };

        let value = bson_to_json(Bson::Document(document));
        assert_eq!(value["refs"][0]["ref"], json!(oid.to_hex()));
    }

    #[test]
    fn plain_scalars_pass_through() {
        let document = doc! {
            "int": 42_i64,
            "float": 1.5_f64,
            "text": "hello",
            "flag": true,
            "none": Bson::Null,
        };

        let value = bson_to_json(Bson::Document(document));
        assert_eq!(
            value,
            json!({ "int": 42, "float": 1.5, "text": "hello", "flag": true, "none": null })
        );
    }

    #[test]
    fn inserted_id_renders_as_string() {
        let oid = ObjectId::new();
        assert_eq!(inserted_id_string(Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(inserted_id_string(Bson::String("abc".into())), "abc");
    }

    #[test]
    fn stored_documents_round_trip_to_songs() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "id": 3_i64, "title": "A" };

        let song = document_to_song(document).unwrap();
        assert_eq!(song.id, 3);
        assert_eq!(song.fields["_id"], json!(oid.to_hex()));
        assert_eq!(song.fields["title"], json!("A"));
    }

    #[test]
    fn documents_without_id_are_rejected() {
        let document = doc! { "title": "A" };
        assert!(document_to_song(document).is_err());
    }
}

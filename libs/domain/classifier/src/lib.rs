// [libs/domain/classifier/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SITE CLASSIFIER (ESTRATO L5)
 * RESPONSABILIDAD: ETIQUETADO DE CATEGORÍA POR DICCIONARIO
 * =================================================================
 */

pub mod classifier;
pub mod errors;
pub mod scoring;

pub use classifier::{Classifier, ClassifierConfig};
pub use errors::{ClassifierError, ClassifierResult};
pub use scoring::{score_categories, CategoryDictionary};

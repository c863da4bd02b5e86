// ============================================================================
// Lumenboard - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod analytics; // Annotations, couleurs, régression, insights
pub mod api;       // API d'analyse + générateur mock
pub mod app;       // État de l'application
pub mod config;    // Variables d'environnement LUMENBOARD_*
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur

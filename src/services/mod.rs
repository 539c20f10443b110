/*
 * Responsibility
 * - Domain services used by middleware and handlers
 * - auth: key store, bearer extraction, token verification, issuer policy, gate
 */
pub mod auth;

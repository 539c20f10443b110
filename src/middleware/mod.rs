/*
 * Responsibility
 * - auth: bearer gate in front of protected routes
 * - http: request id / trace / limits for every route
 */
pub mod auth;
pub mod http;

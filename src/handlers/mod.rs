// handlers/mod.rs - HTTP handlers
//
// Two groups:
// - public:  /login, /health (never authenticated)
// - squares: the /squares resource. Reads are public; create, update and
//            delete run behind the auth middleware attached in app.rs.

pub mod public;
pub mod squares;

/*
REQUEST PIPELINE FOR WRITES:

  router (method + path)
    → jwt_auth_middleware   401 no bearer credential / 403 bad token
    → square_id             400 non-integer :id
    → JSON body             400 unparseable body
    → input::validate       400 missing title/plane/purpose/class
    → input::sanitize       strip <...> from text fields
    → SquareStore           one parameterized statement on a pooled connection
    → JSON response         201 / 200, or 404 when the id matched nothing

Anything that fails inside the store becomes the opaque 500 body; a panic is
caught by the CatchPanicLayer in app.rs and answered the same way.
*/

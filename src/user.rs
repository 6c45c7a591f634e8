use serde::Serialize;



/// A user account as seen by the blog.
///
/// Accounts are managed elsewhere; the blog only reads the username and the staff flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
	pub id: i64,
	pub username: String,
	/// Only staff members may author posts.
	pub is_staff: bool
}

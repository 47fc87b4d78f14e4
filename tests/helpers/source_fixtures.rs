//! Common source code fixtures for tests.

pub const PERSON_MODULE: &str = r#"
/// A person in the directory
class Person {
  name: String
  age: Int
  email: String?

  function greet(other: Person): String = "Hello, \(other.name)"
}

people: Listing<Person> = new {
  new {
    name = "Ada"
    age = 36
  }
}
"#;

pub const SERVER_LIB: &str = r#"
module server

class Endpoint {
  host: String
  port: Int = 8080
}

default: Endpoint = new { host = "localhost" }

local secret = "hidden"
"#;

pub const SERVER_MAIN: &str = r#"
import "lib/server.pkl"

endpoint = server.default
port = server.default.port
"#;

pub const ANNOTATIONS: &str = r#"
class Marker extends Annotation
abstract class Base extends Annotation
class Plain

@Marker
a = 1

@Base
b = 2

@Plain
c = 3

@Missing
d = 4
"#;

// Generates the tonic service stubs for the catalog and auth services.
//
// Messages are hand-written prost structs in `src/proto.rs`, so there is no
// `.proto` file; only the service plumbing is generated here.

fn method(
    name: &str,
    route_name: &str,
    input: &str,
    output: &str,
) -> tonic_build::manual::MethodBuilder {
    tonic_build::manual::Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::proto::{}", input))
        .output_type(format!("crate::proto::{}", output))
        .codec_path("tonic::codec::ProstCodec")
}

fn main() {
    let laptop_service = tonic_build::manual::Service::builder()
        .name("LaptopService")
        .package("laptop.v1")
        .method(
            method(
                "create_laptop",
                "CreateLaptop",
                "CreateLaptopRequest",
                "CreateLaptopResponse",
            )
            .build(),
        )
        .method(
            method(
                "search_laptop",
                "SearchLaptop",
                "SearchLaptopRequest",
                "SearchLaptopResponse",
            )
            .server_streaming()
            .build(),
        )
        .method(
            method(
                "upload_image",
                "UploadImage",
                "UploadImageRequest",
                "UploadImageResponse",
            )
            .client_streaming()
            .build(),
        )
        .method(
            method(
                "rate_laptop",
                "RateLaptop",
                "RateLaptopRequest",
                "RateLaptopResponse",
            )
            .client_streaming()
            .server_streaming()
            .build(),
        )
        .build();

    let auth_service = tonic_build::manual::Service::builder()
        .name("AuthService")
        .package("laptop.v1")
        .method(method("login", "Login", "LoginRequest", "LoginResponse").build())
        .build();

    tonic_build::manual::Builder::new().compile(&[laptop_service, auth_service]);
}
